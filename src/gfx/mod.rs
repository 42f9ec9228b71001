//! Graphics layer: camera, geometry, GPU resources, and the deferred
//! rendering pipeline.

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;

pub use camera::{CameraController, EulerCamera};
pub use rendering::{FramePlan, RenderEngine};
