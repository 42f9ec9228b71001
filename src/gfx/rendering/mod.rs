//! Deferred rendering pipeline: pass planning, render targets, pipelines.

pub mod frame_plan;
pub mod mesh;
pub mod pipeline_manager;
pub mod render_engine;
pub mod render_targets;
pub mod vertex;

pub use frame_plan::{FramePlan, PassPrimitive, PassTarget};
pub use render_engine::RenderEngine;
