//! Pointer and scroll input mapped onto the camera.
//!
//! Raw window events arrive whenever the platform delivers them; the
//! controller only buffers deltas. [`CameraController::apply`] drains the
//! buffer into the camera exactly once per frame, so motion integration does
//! not depend on callback timing.

use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    keyboard::ModifiersState,
};

use super::euler_camera::{CameraMovement, EulerCamera};

/// Orientation drags are coarser than the camera's sensitivity alone;
/// the raw pixel delta is reduced by this factor first.
const ORIENTATION_PRESCALE: f32 = 0.1;

pub struct CameraController {
    modifiers: ModifiersState,
    is_left_pressed: bool,
    /// None until the first sample of a drag; prevents a jump when a new
    /// drag starts far from where the previous one ended.
    last_sample: Option<(f32, f32)>,
    orientation_delta: (f32, f32),
    pan_delta: (f32, f32),
    zoom_delta: f32,
}

impl CameraController {
    pub fn new() -> Self {
        Self {
            modifiers: ModifiersState::empty(),
            is_left_pressed: false,
            last_sample: None,
            orientation_delta: (0.0, 0.0),
            pan_delta: (0.0, 0.0),
            zoom_delta: 0.0,
        }
    }

    /// Feeds one window event into the controller.
    /// Returns true when the event was consumed.
    pub fn process_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = modifiers.state();
                true
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.on_left_button(*state == ElementState::Pressed);
                true
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => *y as f32,
                };
                self.on_scroll(scroll);
                true
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.on_cursor_moved(position.x as f32, position.y as f32);
                true
            }
            _ => false,
        }
    }

    /// Drains the buffered deltas into the camera. Called once per frame.
    pub fn apply(&mut self, camera: &mut EulerCamera, elapsed_seconds: f32) {
        let (yaw_delta, pitch_delta) = std::mem::take(&mut self.orientation_delta);
        if yaw_delta != 0.0 || pitch_delta != 0.0 {
            camera.process_orientation(yaw_delta, pitch_delta, true);
        }

        let (pan_x, pan_y) = std::mem::take(&mut self.pan_delta);
        if pan_x != 0.0 {
            camera.process_translation(CameraMovement::Left, pan_x * elapsed_seconds);
        }
        if pan_y != 0.0 {
            camera.process_translation(CameraMovement::Down, pan_y * elapsed_seconds);
        }

        let zoom = std::mem::take(&mut self.zoom_delta);
        if zoom != 0.0 {
            camera.process_zoom(zoom);
        }
    }

    fn on_left_button(&mut self, pressed: bool) {
        self.is_left_pressed = pressed;
        if !pressed {
            // Next drag re-establishes its own baseline.
            self.last_sample = None;
        }
    }

    fn on_scroll(&mut self, delta: f32) {
        self.zoom_delta += delta;
    }

    fn on_cursor_moved(&mut self, x: f32, y: f32) {
        if !self.is_left_pressed {
            return;
        }

        let orienting = self.modifiers.control_key();
        let panning = !orienting && self.modifiers.shift_key();
        if !orienting && !panning {
            return;
        }

        let (last_x, last_y) = *self.last_sample.get_or_insert((x, y));
        let delta_x = x - last_x;
        // Reversed: surface y grows downward, pitch grows upward.
        let delta_y = last_y - y;
        self.last_sample = Some((x, y));

        if orienting {
            self.orientation_delta.0 += delta_x * ORIENTATION_PRESCALE;
            self.orientation_delta.1 += delta_y * ORIENTATION_PRESCALE;
        } else {
            self.pan_delta.0 += delta_x;
            self.pan_delta.1 += delta_y;
        }
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cgmath::{EuclideanSpace, InnerSpace};

    const EPS: f32 = 1e-5;

    fn controller_with(modifiers: ModifiersState) -> CameraController {
        let mut controller = CameraController::new();
        controller.modifiers = modifiers;
        controller
    }

    #[test]
    fn control_drag_changes_orientation() {
        let mut controller = controller_with(ModifiersState::CONTROL);
        controller.on_left_button(true);
        controller.on_cursor_moved(100.0, 100.0);
        controller.on_cursor_moved(110.0, 90.0);

        let mut camera = EulerCamera::default();
        let before = camera.pose();
        controller.apply(&mut camera, 0.016);
        let after = camera.pose();

        // 10 px * 0.1 pre-scale * 0.05 sensitivity = 0.05 degrees per axis.
        assert_relative_eq!(after.yaw - before.yaw, 0.05, epsilon = EPS);
        assert_relative_eq!(after.pitch - before.pitch, 0.05, epsilon = EPS);
    }

    #[test]
    fn shift_drag_pans_the_camera() {
        let mut controller = controller_with(ModifiersState::SHIFT);
        controller.on_left_button(true);
        controller.on_cursor_moved(200.0, 200.0);
        controller.on_cursor_moved(210.0, 204.0);

        let mut camera = EulerCamera::default();
        let elapsed = 0.25;
        controller.apply(&mut camera, elapsed);

        // delta_x = +10 -> Left by 10 * dt; delta_y = -4 -> Down by -4 * dt.
        let displacement = camera.position().to_vec();
        let camera_ref = EulerCamera::default();
        assert_relative_eq!(
            displacement.dot(camera_ref.front()),
            0.0,
            epsilon = EPS
        );
        // Left translation along -right, scaled by speed (2.5).
        let expected_x = -10.0 * elapsed * 2.5;
        let expected_y = 4.0 * elapsed * 2.5;
        assert_relative_eq!(displacement.x, expected_x, epsilon = EPS);
        assert_relative_eq!(displacement.y, expected_y, epsilon = EPS);
    }

    #[test]
    fn release_resets_drag_baseline() {
        let mut controller = controller_with(ModifiersState::CONTROL);
        controller.on_left_button(true);
        controller.on_cursor_moved(100.0, 100.0);
        controller.on_cursor_moved(105.0, 100.0);
        controller.on_left_button(false);

        // A new drag far away must not register the gap as movement.
        controller.on_left_button(true);
        controller.on_cursor_moved(700.0, 500.0);

        let mut camera = EulerCamera::default();
        let before = camera.pose();
        controller.apply(&mut camera, 0.016);
        let after = camera.pose();

        assert_relative_eq!(after.yaw - before.yaw, 5.0 * 0.1 * 0.05, epsilon = EPS);
    }

    #[test]
    fn drag_without_modifier_is_ignored() {
        let mut controller = controller_with(ModifiersState::empty());
        controller.on_left_button(true);
        controller.on_cursor_moved(100.0, 100.0);
        controller.on_cursor_moved(300.0, 300.0);

        let mut camera = EulerCamera::default();
        let before = camera.pose();
        controller.apply(&mut camera, 0.016);
        assert_eq!(camera.pose(), before);
    }

    #[test]
    fn scroll_deltas_accumulate_until_applied() {
        let mut controller = controller_with(ModifiersState::empty());
        controller.on_scroll(2.0);
        controller.on_scroll(3.0);

        let mut camera = EulerCamera::default();
        controller.apply(&mut camera, 0.016);
        assert_eq!(camera.zoom(), 40.0);

        // Drained: a second apply must not zoom again.
        controller.apply(&mut camera, 0.016);
        assert_eq!(camera.zoom(), 40.0);
    }
}
