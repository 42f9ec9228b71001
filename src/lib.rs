// src/lib.rs
//! Furshell
//!
//! A real-time fur-shell renderer built on wgpu and winit. A sphere is drawn
//! twice at slightly different scales through a three-pass deferred pipeline:
//! a base pass recording the inner shell's surface positions, a geometry pass
//! filling a G-buffer for the outer fur shell, and a lighting pass that
//! composites the final image from the G-buffer on a full-screen quad.

pub mod app;
pub mod error;
pub mod frame_clock;
pub mod gfx;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::FurshellApp;
pub use error::RenderError;

/// Creates a default Furshell application instance
pub fn default() -> FurshellApp {
    FurshellApp::new()
}
