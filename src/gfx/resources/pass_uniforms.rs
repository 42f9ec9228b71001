//! Per-pass uniform data shared by all three pipeline stages.

use cgmath::{Matrix4, Point3, SquareMatrix, Vector3};

use crate::wgpu_utils::uniform_buffer::UniformBuffer;

/// Uniform bundle uploaded once per pass per frame.
///
/// Every pass gets the full record even when it only reads a subset; the
/// layout MUST match the `PassUniforms` struct in the WGSL shaders exactly.
/// Vectors are stored in homogeneous coordinates for 16-byte alignment.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PassUniforms {
    pub model: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub view_pos: [f32; 4],
    pub light_pos: [f32; 4],
}

impl PassUniforms {
    pub fn new(
        model: Matrix4<f32>,
        view: Matrix4<f32>,
        projection: Matrix4<f32>,
        view_pos: Point3<f32>,
        light_pos: Vector3<f32>,
    ) -> Self {
        Self {
            model: model.into(),
            view: view.into(),
            projection: projection.into(),
            view_pos: [view_pos.x, view_pos.y, view_pos.z, 1.0],
            light_pos: [light_pos.x, light_pos.y, light_pos.z, 1.0],
        }
    }
}

impl Default for PassUniforms {
    fn default() -> Self {
        Self {
            model: Matrix4::identity().into(),
            view: Matrix4::identity().into(),
            projection: Matrix4::identity().into(),
            view_pos: [0.0, 0.0, 0.0, 1.0],
            light_pos: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

/// Uniform buffer holding one [`PassUniforms`] record
pub type PassUbo = UniformBuffer<PassUniforms>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_gpu_aligned() {
        // 3 mat4 + 2 vec4 = 3*64 + 2*16 bytes, 16-byte aligned.
        assert_eq!(std::mem::size_of::<PassUniforms>(), 224);
        assert_eq!(std::mem::size_of::<PassUniforms>() % 16, 0);
    }

    #[test]
    fn vectors_are_homogeneous() {
        let uniforms = PassUniforms::new(
            Matrix4::identity(),
            Matrix4::identity(),
            Matrix4::identity(),
            Point3::new(1.0, 2.0, 3.0),
            Vector3::new(0.0, 2.0, 2.0),
        );
        assert_eq!(uniforms.view_pos, [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(uniforms.light_pos, [0.0, 2.0, 2.0, 1.0]);
    }
}
