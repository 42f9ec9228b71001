//! Free-look camera driven by Euler angles.
//!
//! Position and yaw/pitch (in degrees) are the source of truth; the
//! orthonormal front/right/up basis is re-derived whenever an angle changes.

use cgmath::{perspective, Deg, InnerSpace, Matrix4, Point3, Vector3};
use serde::{Deserialize, Serialize};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

const DEFAULT_YAW: f32 = -90.0;
const DEFAULT_PITCH: f32 = 0.0;
const SPEED: f32 = 2.5;
const SENSITIVITY: f32 = 0.05;
const DEFAULT_ZOOM: f32 = 45.0;

// Pitch is kept strictly inside (-90, 90) so the basis never degenerates.
const PITCH_LIMIT: f32 = 89.0;
const MIN_ZOOM: f32 = 1.0;

const ZNEAR: f32 = 0.1;
const ZFAR: f32 = 100.0;

/// The six translation directions the camera understands,
/// abstracted from any windowing system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

/// Serializable snapshot of the camera's independent state.
///
/// The basis vectors are derived, so position, angles and zoom are enough to
/// reconstruct an identical camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub position: [f32; 3],
    pub yaw: f32,
    pub pitch: f32,
    pub zoom: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct EulerCamera {
    position: Point3<f32>,
    front: Vector3<f32>,
    up: Vector3<f32>,
    right: Vector3<f32>,
    world_up: Vector3<f32>,
    /// Euler angles in degrees
    yaw: f32,
    pitch: f32,
    speed: f32,
    sensitivity: f32,
    /// Vertical field of view in degrees
    zoom: f32,
}

impl EulerCamera {
    pub fn new(position: Point3<f32>) -> Self {
        let mut camera = Self {
            position,
            front: -Vector3::unit_z(), // Re-derived below
            up: Vector3::unit_y(),
            right: Vector3::unit_x(),
            world_up: Vector3::unit_y(),
            yaw: DEFAULT_YAW,
            pitch: DEFAULT_PITCH,
            speed: SPEED,
            sensitivity: SENSITIVITY,
            zoom: DEFAULT_ZOOM,
        };
        camera.update_vectors();
        camera
    }

    /// Reconstructs a camera from a serialized pose
    pub fn from_pose(pose: &CameraPose) -> Self {
        let mut camera = Self::new(Point3::new(
            pose.position[0],
            pose.position[1],
            pose.position[2],
        ));
        camera.yaw = pose.yaw;
        camera.pitch = pose.pitch;
        camera.zoom = pose.zoom;
        camera.update_vectors();
        camera
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose {
            position: [self.position.x, self.position.y, self.position.z],
            yaw: self.yaw,
            pitch: self.pitch,
            zoom: self.zoom,
        }
    }

    /// View matrix looking from the current position along the front vector
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// Perspective projection with the current zoom as vertical field of view.
    ///
    /// Includes the depth-range correction from OpenGL clip space (z in
    /// [-1, 1]) to wgpu clip space (z in [0, 1]). The caller must guarantee
    /// `height > 0`.
    pub fn projection_matrix(&self, width: u32, height: u32) -> Matrix4<f32> {
        debug_assert!(height > 0, "projection aspect requires height > 0");
        let aspect = width as f32 / height as f32;
        OPENGL_TO_WGPU_MATRIX * perspective(Deg(self.zoom), aspect, ZNEAR, ZFAR)
    }

    /// Applies a pointer delta to yaw/pitch and re-derives the basis
    pub fn process_orientation(&mut self, delta_x: f32, delta_y: f32, constrain_pitch: bool) {
        self.yaw += delta_x * self.sensitivity;
        self.pitch += delta_y * self.sensitivity;

        if constrain_pitch {
            self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }

        self.update_vectors();
    }

    /// Moves the position along the basis at `speed` units per second
    pub fn process_translation(&mut self, direction: CameraMovement, elapsed_seconds: f32) {
        let distance = self.speed * elapsed_seconds;
        match direction {
            CameraMovement::Forward => self.position += self.front * distance,
            CameraMovement::Backward => self.position -= self.front * distance,
            CameraMovement::Left => self.position -= self.right * distance,
            CameraMovement::Right => self.position += self.right * distance,
            CameraMovement::Up => self.position += self.up * distance,
            CameraMovement::Down => self.position -= self.up * distance,
        }
    }

    /// Narrows the field of view by `delta` degrees, floored at 1.0.
    /// There is deliberately no upper clamp.
    pub fn process_zoom(&mut self, delta: f32) {
        self.zoom -= delta;
        if self.zoom < MIN_ZOOM {
            self.zoom = MIN_ZOOM;
        }
    }

    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    pub fn front(&self) -> Vector3<f32> {
        self.front
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Re-derives front, then right, then up. The order matters: right and
    /// up both depend on the freshly computed front vector.
    fn update_vectors(&mut self) {
        let yaw = self.yaw.to_radians();
        let pitch = self.pitch.to_radians();

        let front = Vector3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        );
        self.front = front.normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

impl Default for EulerCamera {
    fn default() -> Self {
        Self::new(Point3::new(0.0, 0.0, 0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cgmath::InnerSpace;

    const EPS: f32 = 1e-5;

    fn assert_unit(v: Vector3<f32>) {
        assert_relative_eq!(v.magnitude(), 1.0, epsilon = EPS);
    }

    #[test]
    fn basis_stays_orthonormal_across_angles() {
        for &yaw in &[-180.0_f32, -90.0, -45.0, 0.0, 30.0, 90.0, 180.0, 400.0] {
            for &pitch in &[-89.0_f32, -45.0, 0.0, 45.0, 89.0] {
                let mut camera = EulerCamera::default();
                camera.process_orientation(
                    (yaw - DEFAULT_YAW) / SENSITIVITY,
                    pitch / SENSITIVITY,
                    true,
                );

                assert_unit(camera.front);
                assert_unit(camera.right);
                assert_unit(camera.up);
                assert_relative_eq!(camera.front.dot(camera.right), 0.0, epsilon = EPS);
                assert_relative_eq!(camera.front.dot(camera.up), 0.0, epsilon = EPS);
                assert_relative_eq!(camera.right.dot(camera.up), 0.0, epsilon = EPS);
            }
        }
    }

    #[test]
    fn pitch_is_clamped_to_limit() {
        let mut camera = EulerCamera::default();
        camera.process_orientation(0.0, 10_000.0, true);
        assert_eq!(camera.pitch, PITCH_LIMIT);

        camera.process_orientation(0.0, -100_000.0, true);
        assert_eq!(camera.pitch, -PITCH_LIMIT);
    }

    #[test]
    fn unconstrained_pitch_is_not_clamped() {
        let mut camera = EulerCamera::default();
        camera.process_orientation(0.0, 2000.0, false);
        assert!(camera.pitch > PITCH_LIMIT);
    }

    #[test]
    fn zoom_never_drops_below_minimum() {
        let mut camera = EulerCamera::default();
        for _ in 0..100 {
            camera.process_zoom(7.5);
        }
        assert_eq!(camera.zoom(), MIN_ZOOM);

        // Zooming back out is unbounded.
        camera.process_zoom(-200.0);
        assert_eq!(camera.zoom(), MIN_ZOOM + 200.0);
    }

    #[test]
    fn scroll_delta_subtracts_from_zoom() {
        let mut camera = EulerCamera::default();
        assert_eq!(camera.zoom(), 45.0);
        camera.process_zoom(5.0);
        assert_eq!(camera.zoom(), 40.0);
    }

    #[test]
    fn translation_displacement_matches_speed() {
        let elapsed = 0.4_f32;
        let cases = [
            (CameraMovement::Forward, 1.0_f32, true),
            (CameraMovement::Backward, -1.0, true),
            (CameraMovement::Left, -1.0, false),
            (CameraMovement::Right, 1.0, false),
        ];
        for (direction, sign, along_front) in cases {
            let mut camera = EulerCamera::default();
            let start = camera.position();
            let axis = if along_front {
                camera.front
            } else {
                camera.right
            };
            camera.process_translation(direction, elapsed);
            let displacement = camera.position() - start;
            assert_relative_eq!(displacement.magnitude(), SPEED * elapsed, epsilon = EPS);
            assert_relative_eq!(
                displacement.dot(axis),
                sign * SPEED * elapsed,
                epsilon = EPS
            );
        }

        let mut camera = EulerCamera::default();
        let up = camera.up;
        camera.process_translation(CameraMovement::Up, elapsed);
        camera.process_translation(CameraMovement::Down, elapsed);
        camera.process_translation(CameraMovement::Down, elapsed);
        let displacement = camera.position() - Point3::new(0.0, 0.0, 0.0);
        assert_relative_eq!(displacement.dot(up), -SPEED * elapsed, epsilon = EPS);
    }

    #[test]
    fn default_camera_looks_down_negative_z() {
        let camera = EulerCamera::default();
        let front = camera.front();
        assert_relative_eq!(front.x, 0.0, epsilon = EPS);
        assert_relative_eq!(front.y, 0.0, epsilon = EPS);
        assert_relative_eq!(front.z, -1.0, epsilon = EPS);
    }

    #[test]
    fn pose_round_trips_through_ron() {
        let mut camera = EulerCamera::new(Point3::new(1.5, -0.25, 3.0));
        camera.process_orientation(120.0, -310.0, true);
        camera.process_zoom(12.5);

        let text = ron::to_string(&camera.pose()).unwrap();
        let pose: CameraPose = ron::from_str(&text).unwrap();
        let restored = EulerCamera::from_pose(&pose);

        let original: [[f32; 4]; 4] = camera.view_matrix().into();
        let rebuilt: [[f32; 4]; 4] = restored.view_matrix().into();
        for col in 0..4 {
            for row in 0..4 {
                assert_relative_eq!(original[col][row], rebuilt[col][row], epsilon = EPS);
            }
        }
    }

    #[test]
    fn projection_is_deterministic() {
        let mut camera = EulerCamera::default();
        camera.process_zoom(5.0);
        assert_eq!(camera.zoom(), 40.0);

        let first: [[f32; 4]; 4] = camera.projection_matrix(800, 600).into();
        let second: [[f32; 4]; 4] = camera.projection_matrix(800, 600).into();
        assert_eq!(first, second);
    }
}
