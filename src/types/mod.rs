//! Value types shared by the wire codec and the data model.
//!
//! This module re-exports the math types from `glam` under the names the
//! wire protocol uses and adds the types the protocol defines itself:
//! an RGBA color and the tagged [`Value`] union carried by the per-path
//! and per-intersection user data bags.

// Re-export glam types under the protocol's vocabulary
pub use glam::{IVec2, IVec3, Vec2, Vec3};

/// 2D point, single precision.
pub type Point2f = Vec2;
/// 2D point, integer.
pub type Point2i = IVec2;
/// 3D point, single precision.
pub type Point3f = Vec3;
/// 3D point, integer.
pub type Point3i = IVec3;
/// 3D vector, single precision.
pub type Vec3f = Vec3;
/// 3D vector, integer.
pub type Vec3i = IVec3;

/// RGBA color, four `f32` components on the wire.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Color3f {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color3f {
    /// Create a new color from components.
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Mean of the three color channels, ignoring alpha.
    #[inline]
    pub fn mean(&self) -> f32 {
        (self.r + self.g + self.b) / 3.0
    }
}

impl From<[f32; 4]> for Color3f {
    fn from(c: [f32; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }
}

/// One value inside a user data bag.
///
/// The server attaches arbitrarily named values to paths and intersections;
/// each named entry holds a small list of one of these variants.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Bool(bool),
    Float(f32),
    Double(f64),
    Int(i32),
    Point2i(Point2i),
    Point2f(Point2f),
    Point3i(Point3i),
    Point3f(Point3f),
    Color3f(Color3f),
    String(String),
}

impl Value {
    /// Short type name, used for display in inspection views.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::Int(_) => "int",
            Value::Point2i(_) => "point2i",
            Value::Point2f(_) => "point2f",
            Value::Point3i(_) => "point3i",
            Value::Point3f(_) => "point3f",
            Value::Color3f(_) => "color3f",
            Value::String(_) => "string",
        }
    }
}
