pub mod camera_controller;
pub mod euler_camera;

// Re-export main types
pub use camera_controller::CameraController;
pub use euler_camera::{CameraMovement, CameraPose, EulerCamera};
