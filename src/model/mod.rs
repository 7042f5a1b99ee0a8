//! In-memory data model populated by the protocol engine.
//!
//! One instance of [`DataModel`] exists per session. The receive loop is
//! its only writer: each message handler deserializes a fresh entity, then
//! publishes it here in one step, so readers never observe a half-parsed
//! message.

mod camera;
mod intersection_data;
mod mesh;
mod path_data;
mod render_data;
mod render_info;
mod user_data;

pub use camera::CameraData;
pub use intersection_data::IntersectionData;
pub use mesh::{Mesh, MeshData};
pub use path_data::PathData;
pub use render_data::RenderData;
pub use render_info::RenderInfo;
pub use user_data::{CustomBlock, UserData};

/// All per-session state a message stream populates.
///
/// Meshes are appended one per scene-data message; render data is replaced
/// wholesale per pixel-data message; render info and camera are replaced
/// wholesale on their messages.
#[derive(Debug, Default)]
pub struct DataModel {
    pub render_info: RenderInfo,
    pub camera: CameraData,
    pub meshes: MeshData,
    pub render_data: RenderData,
}

impl DataModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all scene geometry; called when a new scene load begins.
    pub fn clear_meshes(&mut self) {
        self.meshes.clear();
    }
}
