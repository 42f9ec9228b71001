//! Error types for startup-fatal failures.
//!
//! Only failures that prevent the renderer from coming up at all are typed;
//! per-frame problems (incomplete targets, missing pipelines, bad assets) are
//! logged and rendering continues.

use thiserror::Error;

/// Errors that abort startup before the first frame
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create rendering surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable graphics adapter found: {0}")]
    AdapterRequest(#[from] wgpu::RequestAdapterError),

    #[error("failed to acquire graphics device: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),

    #[error("failed to create window: {0}")]
    WindowCreation(#[from] winit::error::OsError),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}
