//! Scene geometry streamed by the server.

use tracing::debug;

use crate::stream::Stream;
use crate::types::Color3f;
use crate::util::Result;

/// One triangle mesh: a flat vertex buffer, a cell-list triangle buffer
/// and two materials colors (alpha carried).
///
/// The wire sends plain index triples; in memory every triangle is
/// prefixed with its vertex count `3`, the cell-list layout the scene
/// viewer consumes directly.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub vertex_count: u32,
    /// `vertex_count * 3` floats, xyz per vertex.
    pub vertices: Vec<f32>,
    pub triangle_count: u32,
    /// Cell list: `[3, i0, i1, i2, 3, i3, ...]`.
    pub triangles: Vec<i64>,
    pub specular: Color3f,
    pub diffuse: Color3f,
}

impl Mesh {
    /// Read one mesh payload from the stream.
    pub fn deserialize<S: Stream + ?Sized>(stream: &mut S) -> Result<Self> {
        let vertex_count = stream.read_u32()?;
        let vertices = stream.read_f32_array(vertex_count as usize * 3)?;

        let triangle_count = stream.read_u32()?;
        let indices = stream.read_i32_array(triangle_count as usize * 3)?;
        let mut triangles = Vec::with_capacity(triangle_count as usize * 4);
        for tri in indices.chunks_exact(3) {
            triangles.push(3);
            triangles.push(tri[0] as i64);
            triangles.push(tri[1] as i64);
            triangles.push(tri[2] as i64);
        }

        // the colors carry the alpha channel
        let specular = stream.read_color3f()?;
        let diffuse = stream.read_color3f()?;

        debug!(
            "Mesh: {} vertices, {} triangles",
            vertex_count, triangle_count
        );

        Ok(Self {
            vertex_count,
            vertices,
            triangle_count,
            triangles,
            specular,
            diffuse,
        })
    }
}

/// Append-only list of all meshes in the scene.
///
/// One scene-data message carries exactly one mesh; the list is cleared
/// only when a new scene load begins.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    meshes: Vec<Mesh>,
}

impl MeshData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deserialize one mesh from the stream and append it.
    pub fn deserialize_mesh<S: Stream + ?Sized>(&mut self, stream: &mut S) -> Result<&Mesh> {
        let mesh = Mesh::deserialize(stream)?;
        self.meshes.push(mesh);
        Ok(&self.meshes[self.meshes.len() - 1])
    }

    /// Append an already-deserialized mesh.
    pub fn push(&mut self, mesh: Mesh) {
        self.meshes.push(mesh);
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    pub fn clear(&mut self) {
        self.meshes.clear();
    }
}
