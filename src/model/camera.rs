//! Camera parameters of the rendered view.

use crate::stream::Stream;
use crate::types::{Point3f, Vec3f};
use crate::util::Result;

/// Camera data used to initialise the 3D scene viewer.
///
/// Immutable once deserialized; a new camera message replaces the whole
/// struct.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CameraData {
    pub near_clip: f32,
    pub far_clip: f32,
    pub focus_dist: f32,
    pub fov: f32,
    pub up: Vec3f,
    pub direction: Vec3f,
    pub origin: Point3f,
}

impl CameraData {
    /// Read one camera payload from the stream.
    pub fn deserialize<S: Stream + ?Sized>(stream: &mut S) -> Result<Self> {
        Ok(Self {
            near_clip: stream.read_f32()?,
            far_clip: stream.read_f32()?,
            focus_dist: stream.read_f32()?,
            fov: stream.read_f32()?,
            up: stream.read_vec3f()?,
            direction: stream.read_vec3f()?,
            origin: stream.read_point3f()?,
        })
    }
}
