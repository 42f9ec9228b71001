//! Per-frame pass planning.
//!
//! Each frame is described by an explicit, ordered plan of three passes
//! before any GPU work happens: base shell, fur-shell geometry, lighting
//! composite. The plan is pure data derived from the camera and the scene
//! constants, so sequencing invariants are testable without a device.

use cgmath::{Matrix4, Vector3};

use crate::gfx::camera::EulerCamera;
use crate::gfx::resources::pass_uniforms::PassUniforms;

/// Scale of the inner shell drawn by the base pass
pub const BASE_SHELL_SCALE: f32 = 0.225;
/// Scale of the outer fur shell drawn by the geometry pass.
/// Must stay larger than [`BASE_SHELL_SCALE`]; the gap is the fur thickness.
pub const FUR_SHELL_SCALE: f32 = 0.25;

/// Where a pass renders to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassTarget {
    /// Offscreen base-position target
    BasePosition,
    /// Offscreen G-buffer (three color outputs + depth)
    GBuffer,
    /// The swapchain surface; the implicit destination when nothing
    /// offscreen is bound
    Surface,
}

/// What a pass draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassPrimitive {
    Sphere,
    FullscreenQuad,
}

/// One render pass of the frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassDesc {
    pub label: &'static str,
    pub target: PassTarget,
    pub primitive: PassPrimitive,
    pub uniforms: PassUniforms,
}

/// The fixed three-pass sequence for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
    pub passes: [PassDesc; 3],
}

impl FramePlan {
    /// Builds the plan for one frame from the current camera state.
    ///
    /// `width`/`height` is the surface resolution feeding the projection;
    /// the caller guarantees `height > 0`.
    pub fn build(
        camera: &EulerCamera,
        width: u32,
        height: u32,
        object_position: Vector3<f32>,
        light_position: Vector3<f32>,
    ) -> Self {
        let view = camera.view_matrix();
        let projection = camera.projection_matrix(width, height);
        let view_pos = camera.position();

        let base_model =
            Matrix4::from_translation(object_position) * Matrix4::from_scale(BASE_SHELL_SCALE);
        let fur_model =
            Matrix4::from_translation(object_position) * Matrix4::from_scale(FUR_SHELL_SCALE);

        let passes = [
            PassDesc {
                label: "Fur Base Pass",
                target: PassTarget::BasePosition,
                primitive: PassPrimitive::Sphere,
                uniforms: PassUniforms::new(base_model, view, projection, view_pos, light_position),
            },
            PassDesc {
                label: "Geometry Pass",
                target: PassTarget::GBuffer,
                primitive: PassPrimitive::Sphere,
                uniforms: PassUniforms::new(fur_model, view, projection, view_pos, light_position),
            },
            PassDesc {
                label: "Lighting Pass",
                target: PassTarget::Surface,
                primitive: PassPrimitive::FullscreenQuad,
                uniforms: PassUniforms::new(
                    Matrix4::from_scale(1.0),
                    view,
                    projection,
                    view_pos,
                    light_position,
                ),
            },
        ];

        Self { passes }
    }

    /// Number of passes that render into the given target
    pub fn bind_count(&self, target: PassTarget) -> usize {
        self.passes.iter().filter(|p| p.target == target).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cgmath::Point3;

    fn plan() -> FramePlan {
        let camera = EulerCamera::new(Point3::new(0.0, 0.0, 1.0));
        FramePlan::build(
            &camera,
            800,
            600,
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 2.0, 2.0),
        )
    }

    #[test]
    fn passes_run_in_fixed_order() {
        let plan = plan();
        let targets: Vec<_> = plan.passes.iter().map(|p| p.target).collect();
        assert_eq!(
            targets,
            vec![
                PassTarget::BasePosition,
                PassTarget::GBuffer,
                PassTarget::Surface
            ]
        );
        assert_eq!(plan.passes[0].primitive, PassPrimitive::Sphere);
        assert_eq!(plan.passes[1].primitive, PassPrimitive::Sphere);
        assert_eq!(plan.passes[2].primitive, PassPrimitive::FullscreenQuad);
    }

    #[test]
    fn each_offscreen_target_is_bound_exactly_once() {
        let plan = plan();
        assert_eq!(plan.bind_count(PassTarget::BasePosition), 1);
        assert_eq!(plan.bind_count(PassTarget::GBuffer), 1);
        // The final pass leaves no offscreen target bound.
        assert_eq!(plan.passes.last().unwrap().target, PassTarget::Surface);
    }

    #[test]
    fn fur_shell_wraps_the_base_shell() {
        assert!(FUR_SHELL_SCALE > BASE_SHELL_SCALE);

        let plan = plan();
        // Uniform scale sits on the diagonal of the model matrix.
        assert_relative_eq!(plan.passes[0].uniforms.model[0][0], BASE_SHELL_SCALE);
        assert_relative_eq!(plan.passes[1].uniforms.model[0][0], FUR_SHELL_SCALE);
    }

    #[test]
    fn object_translation_lands_in_the_model_matrix() {
        let camera = EulerCamera::new(Point3::new(0.0, 0.0, 1.0));
        let plan = FramePlan::build(
            &camera,
            800,
            600,
            Vector3::new(1.0, -2.0, 3.0),
            Vector3::new(0.0, 2.0, 2.0),
        );
        for pass in &plan.passes[..2] {
            assert_eq!(pass.uniforms.model[3][0], 1.0);
            assert_eq!(pass.uniforms.model[3][1], -2.0);
            assert_eq!(pass.uniforms.model[3][2], 3.0);
        }
    }

    #[test]
    fn all_passes_share_camera_and_light_state() {
        let plan = plan();
        for pass in &plan.passes {
            assert_eq!(pass.uniforms.view_pos, [0.0, 0.0, 1.0, 1.0]);
            assert_eq!(pass.uniforms.light_pos, [0.0, 2.0, 2.0, 1.0]);
            assert_eq!(pass.uniforms.view, plan.passes[0].uniforms.view);
            assert_eq!(pass.uniforms.projection, plan.passes[0].uniforms.projection);
        }
    }

    #[test]
    fn plan_is_deterministic_for_identical_state() {
        assert_eq!(plan(), plan());
    }
}
