//! WGPU-based rendering engine for the fur-shell renderer
//!
//! Owns the surface, device, offscreen targets, pipelines, and per-pass
//! uniform buffers, and executes a [`FramePlan`] each frame.

use std::sync::Arc;
use wgpu::TextureFormat;

use log::error;

use crate::error::RenderError;
use crate::gfx::geometry::generate_sphere;
use crate::gfx::resources::pass_uniforms::PassUbo;
use crate::gfx::resources::texture_resource::{
    noise_pattern_pixels, solid_color_pixels, TextureResource,
};

use super::frame_plan::{FramePlan, PassPrimitive, PassTarget};
use super::mesh::GpuMesh;
use super::pipeline_manager::{PipelineConfig, PipelineManager};
use super::render_targets::{BasePassTarget, GBuffer, ATTACHMENT_FORMAT_COLOR, ATTACHMENT_FORMAT_FLOAT};

const SPHERE_SEGMENTS: u32 = 64;

const DIFFUSE_TEXTURE_PATH: &str = "assets/fur_diffuse.png";
const NOISE_TEXTURE_PATH: &str = "assets/fur_noise.png";

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    format: TextureFormat,
    pub pipeline_manager: PipelineManager,

    base_target: BasePassTarget,
    gbuffer: GBuffer,

    base_ubo: PassUbo,
    geometry_ubo: PassUbo,
    lighting_ubo: PassUbo,
    base_uniform_bind_group: wgpu::BindGroup,
    geometry_uniform_bind_group: wgpu::BindGroup,
    lighting_uniform_bind_group: wgpu::BindGroup,

    geometry_texture_bind_group: wgpu::BindGroup,
    lighting_texture_bind_group: wgpu::BindGroup,

    sphere: GpuMesh,
}

impl RenderEngine {
    /// Creates a new render engine for the given window.
    ///
    /// Offscreen targets are sized to the initial surface resolution and
    /// never resized afterwards; window resizes only reconfigure the
    /// swapchain.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<RenderEngine, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let device = Arc::new(device);
        let queue = Arc::new(queue);

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .unwrap_or(surface_capabilities.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_capabilities.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        // Offscreen targets, created once at the initial resolution
        let base_target = BasePassTarget::new(&device, width, height);
        let gbuffer = GBuffer::new(&device, width, height);
        if !base_target.is_complete() {
            error!("base pass target is incomplete; base pass output will be invalid");
        }
        if !gbuffer.is_complete() {
            error!("G-buffer is incomplete; geometry pass output will be invalid");
        }

        // Sampled textures, with procedural fallbacks when assets are absent
        let diffuse_texture = TextureResource::load_from_file_or(
            &device,
            &queue,
            DIFFUSE_TEXTURE_PATH,
            solid_color_pixels([200, 140, 60, 255], 4, 4),
            "Fur Diffuse",
        );
        let noise_texture = TextureResource::load_from_file_or(
            &device,
            &queue,
            NOISE_TEXTURE_PATH,
            noise_pattern_pixels(256),
            "Fur Noise",
        );

        // Per-pass uniform buffers and their shared layout
        let base_ubo = PassUbo::new(&device);
        let geometry_ubo = PassUbo::new(&device);
        let lighting_ubo = PassUbo::new(&device);

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Pass Uniform Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let uniform_bind_group = |ubo: &PassUbo, label: &str| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &uniform_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: ubo.binding_resource(),
                }],
            })
        };
        let base_uniform_bind_group = uniform_bind_group(&base_ubo, "Base Uniform Bind Group");
        let geometry_uniform_bind_group =
            uniform_bind_group(&geometry_ubo, "Geometry Uniform Bind Group");
        let lighting_uniform_bind_group =
            uniform_bind_group(&lighting_ubo, "Lighting Uniform Bind Group");

        // Three sampled textures plus one sampler, shared shape for the
        // geometry and lighting passes
        let sampled_trio_layout = |label: &str| {
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(label),
                entries: &[
                    texture_layout_entry(0),
                    texture_layout_entry(1),
                    texture_layout_entry(2),
                    wgpu::BindGroupLayoutEntry {
                        binding: 3,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            })
        };
        let geometry_texture_layout = sampled_trio_layout("Geometry Texture Layout");
        let lighting_texture_layout = sampled_trio_layout("Lighting Texture Layout");

        let geometry_texture_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Geometry Texture Bind Group"),
            layout: &geometry_texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&diffuse_texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&noise_texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&base_target.position.view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(&diffuse_texture.sampler),
                },
            ],
        });

        let lighting_texture_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Lighting Texture Bind Group"),
            layout: &lighting_texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&gbuffer.position.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&gbuffer.normal.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&gbuffer.albedo_spec.view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(&gbuffer.albedo_spec.sampler),
                },
            ],
        });

        // Pipelines
        let mut pipeline_manager = PipelineManager::new(device.clone());
        pipeline_manager.load_shader("fur_base.wgsl", include_str!("shaders/fur_base.wgsl"));
        pipeline_manager.load_shader(
            "fur_geometry.wgsl",
            include_str!("shaders/fur_geometry.wgsl"),
        );
        pipeline_manager.load_shader(
            "fur_lighting.wgsl",
            include_str!("shaders/fur_lighting.wgsl"),
        );

        let float_target = |format| {
            Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })
        };

        pipeline_manager.register_pipeline(
            "fur_base",
            PipelineConfig::default_with_shader("fur_base.wgsl")
                .with_label("Fur Base Pipeline")
                .with_cull_mode(None)
                .with_bind_group_layouts(vec![uniform_layout.clone()])
                .with_color_targets(vec![float_target(ATTACHMENT_FORMAT_FLOAT)])
                .with_depth_stencil(TextureResource::DEPTH_FORMAT),
        );
        pipeline_manager.register_pipeline(
            "fur_geometry",
            PipelineConfig::default_with_shader("fur_geometry.wgsl")
                .with_label("Fur Geometry Pipeline")
                .with_cull_mode(None)
                .with_bind_group_layouts(vec![uniform_layout.clone(), geometry_texture_layout])
                .with_color_targets(vec![
                    float_target(ATTACHMENT_FORMAT_FLOAT),
                    float_target(ATTACHMENT_FORMAT_FLOAT),
                    float_target(ATTACHMENT_FORMAT_COLOR),
                ])
                .with_depth_stencil(TextureResource::DEPTH_FORMAT),
        );
        pipeline_manager.register_pipeline(
            "fur_lighting",
            PipelineConfig::default_with_shader("fur_lighting.wgsl")
                .with_label("Fur Lighting Pipeline")
                .with_bind_group_layouts(vec![uniform_layout, lighting_texture_layout])
                .with_color_targets(vec![float_target(format)])
                .with_primitive_topology(wgpu::PrimitiveTopology::TriangleStrip)
                .with_cull_mode(None)
                .with_no_vertex_buffers(),
        );
        if let Err(errors) = pipeline_manager.create_all_pipelines() {
            for e in errors {
                error!("{}", e);
            }
        }

        let sphere = GpuMesh::from_geometry(
            &device,
            &generate_sphere(SPHERE_SEGMENTS, SPHERE_SEGMENTS),
            "Sphere",
        );

        Ok(RenderEngine {
            surface,
            device,
            queue,
            config,
            format,
            pipeline_manager,
            base_target,
            gbuffer,
            base_ubo,
            geometry_ubo,
            lighting_ubo,
            base_uniform_bind_group,
            geometry_uniform_bind_group,
            lighting_uniform_bind_group,
            geometry_texture_bind_group,
            lighting_texture_bind_group,
            sphere,
        })
    }

    /// Executes one frame plan: base pass, geometry pass, lighting pass.
    ///
    /// Surface acquisition failures are logged and the frame is dropped;
    /// the next frame reconfigures a lost or outdated swapchain.
    pub fn render_frame(&mut self, plan: &FramePlan) {
        self.upload_uniforms(plan);

        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(err) => {
                error!("failed to acquire surface texture: {}", err);
                return;
            }
        };
        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        for pass in &plan.passes {
            self.encode_pass(&mut encoder, pass, &surface_view);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
    }

    fn upload_uniforms(&mut self, plan: &FramePlan) {
        for pass in &plan.passes {
            match pass.target {
                PassTarget::BasePosition => self.base_ubo.update_content(&self.queue, pass.uniforms),
                PassTarget::GBuffer => self.geometry_ubo.update_content(&self.queue, pass.uniforms),
                PassTarget::Surface => self.lighting_ubo.update_content(&self.queue, pass.uniforms),
            }
        }
    }

    fn encode_pass(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        pass: &super::frame_plan::PassDesc,
        surface_view: &wgpu::TextureView,
    ) {
        let (pipeline_name, color_views, depth_view): (&str, Vec<&wgpu::TextureView>, _) =
            match pass.target {
                PassTarget::BasePosition => (
                    "fur_base",
                    vec![&self.base_target.position.view],
                    Some(&self.base_target.depth.view),
                ),
                PassTarget::GBuffer => (
                    "fur_geometry",
                    vec![
                        &self.gbuffer.position.view,
                        &self.gbuffer.normal.view,
                        &self.gbuffer.albedo_spec.view,
                    ],
                    Some(&self.gbuffer.depth.view),
                ),
                PassTarget::Surface => ("fur_lighting", vec![surface_view], None),
            };

        if self.pipeline_manager.get_pipeline(pipeline_name).is_none() {
            // Already logged; skip the pass rather than tearing the frame down.
            return;
        }

        // Offscreen attachments clear to transparent black so uncovered
        // pixels read back alpha 0; the swapchain clears to opaque black.
        let clear_alpha = if pass.target == PassTarget::Surface {
            1.0
        } else {
            0.0
        };
        let color_attachments: Vec<Option<wgpu::RenderPassColorAttachment>> = color_views
            .iter()
            .map(|view| {
                Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.0,
                            g: 0.0,
                            b: 0.0,
                            a: clear_alpha,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })
            })
            .collect();

        let depth_stencil_attachment =
            depth_view.map(|view| wgpu::RenderPassDepthStencilAttachment {
                view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            });

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(pass.label),
            color_attachments: &color_attachments,
            depth_stencil_attachment,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        // Checked above; the borrow has to be re-taken inside the pass scope.
        let pipeline = match self.pipeline_manager.get_pipeline(pipeline_name) {
            Some(pipeline) => pipeline,
            None => return,
        };
        render_pass.set_pipeline(pipeline);

        match pass.target {
            PassTarget::BasePosition => {
                render_pass.set_bind_group(0, &self.base_uniform_bind_group, &[]);
            }
            PassTarget::GBuffer => {
                render_pass.set_bind_group(0, &self.geometry_uniform_bind_group, &[]);
                render_pass.set_bind_group(1, &self.geometry_texture_bind_group, &[]);
            }
            PassTarget::Surface => {
                render_pass.set_bind_group(0, &self.lighting_uniform_bind_group, &[]);
                render_pass.set_bind_group(1, &self.lighting_texture_bind_group, &[]);
            }
        }

        match pass.primitive {
            PassPrimitive::Sphere => self.sphere.draw(&mut render_pass),
            PassPrimitive::FullscreenQuad => render_pass.draw(0..4, 0..1),
        }
    }

    /// Reconfigures the swapchain surface; offscreen targets keep their
    /// startup resolution
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    pub fn surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn surface_format(&self) -> TextureFormat {
        self.format
    }
}

fn texture_layout_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            multisampled: false,
            view_dimension: wgpu::TextureViewDimension::D2,
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
        },
        count: None,
    }
}
