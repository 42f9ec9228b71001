//! Application shell: window, event loop, and the per-frame driver.

use std::sync::Arc;

use cgmath::{Point3, Vector3};
use log::error;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes},
};

use crate::error::RenderError;
use crate::frame_clock::FrameClock;
use crate::gfx::camera::{CameraController, EulerCamera};
use crate::gfx::rendering::{FramePlan, RenderEngine};

const WINDOW_WIDTH: u32 = 800;
const WINDOW_HEIGHT: u32 = 600;
const WINDOW_TITLE: &str = "Fur Shell";

const CAMERA_START: Point3<f32> = Point3::new(0.0, 0.0, 1.0);
const OBJECT_POSITION: Vector3<f32> = Vector3::new(0.0, 0.0, 0.0);
const LIGHT_POSITION: Vector3<f32> = Vector3::new(0.0, 2.0, 2.0);

/// Top-level application handle
pub struct FurshellApp {
    app_state: AppState,
}

struct AppState {
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    camera: EulerCamera,
    controller: CameraController,
    clock: FrameClock,
    startup_error: Option<RenderError>,
}

impl FurshellApp {
    /// Creates the application with the default camera and scene constants
    pub fn new() -> Self {
        Self {
            app_state: AppState {
                window: None,
                render_engine: None,
                camera: EulerCamera::new(CAMERA_START),
                controller: CameraController::new(),
                clock: FrameClock::new(),
                startup_error: None,
            },
        }
    }

    /// Runs the event loop until the window closes or startup fails
    pub fn run(mut self) -> Result<(), RenderError> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self.app_state)?;

        match self.app_state.startup_error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Default for FurshellApp {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    fn fail_startup(&mut self, event_loop: &ActiveEventLoop, err: RenderError) {
        error!("{err}");
        self.startup_error = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = WindowAttributes::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size(PhysicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => return self.fail_startup(event_loop, err.into()),
        };
        self.window = Some(window.clone());

        let (width, height) = window.inner_size().into();
        match pollster::block_on(RenderEngine::new(window, width, height)) {
            Ok(engine) => self.render_engine = Some(engine),
            Err(err) => self.fail_startup(event_loop, err),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(render_engine) = self.render_engine.as_mut() else {
            return;
        };

        if self.controller.process_event(&event) {
            return;
        }

        match event {
            WindowEvent::KeyboardInput {
                event:
                    winit::event::KeyEvent {
                        physical_key: winit::keyboard::PhysicalKey::Code(key_code),
                        ..
                    },
                ..
            } => {
                if matches!(key_code, winit::keyboard::KeyCode::Escape) {
                    event_loop.exit();
                }
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                render_engine.resize(width, height);
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                let elapsed = self.clock.tick();
                self.controller.apply(&mut self.camera, elapsed);

                let (width, height) = render_engine.surface_size();
                if height == 0 {
                    return;
                }
                let plan =
                    FramePlan::build(&self.camera, width, height, OBJECT_POSITION, LIGHT_POSITION);
                render_engine.render_frame(&plan);
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
