//! # Procedural Geometry Generation
//!
//! Static vertex/index data for the two primitives the pipeline draws:
//! the UV sphere (base and fur shells) and — implicitly — the full-screen
//! quad, which is emitted by the lighting vertex shader and needs no buffers.

pub mod primitives;

pub use primitives::generate_sphere;

/// Raw geometry data produced by the primitive generators
#[derive(Debug, Clone, Default)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Texture coordinates (u, v)
    pub tex_coords: Vec<[f32; 2]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}
