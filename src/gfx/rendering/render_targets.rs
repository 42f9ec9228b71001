//! Offscreen render targets for the deferred pipeline.
//!
//! Two fixed-resolution targets are created once at startup and never
//! resized: the base-pass target (one high-precision color channel + depth)
//! and the G-buffer (position, normal, albedo+specular + depth). Window
//! resizes reconfigure the swapchain surface only.

use crate::gfx::resources::texture_resource::TextureResource;

/// Position and normal channels need float precision
pub const ATTACHMENT_FORMAT_FLOAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;
/// Albedo + specular-intensity packs into four 8-bit channels
pub const ATTACHMENT_FORMAT_COLOR: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Target of the base (stencil) pass: world-space positions of the inner
/// sphere shell, consumed as a sampler input by the geometry pass.
pub struct BasePassTarget {
    pub position: TextureResource,
    pub depth: TextureResource,
    width: u32,
    height: u32,
}

impl BasePassTarget {
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        Self {
            position: TextureResource::create_color_target(
                device,
                width,
                height,
                ATTACHMENT_FORMAT_FLOAT,
                "Base Pass Position",
            ),
            depth: TextureResource::create_depth_target(device, width, height, "Base Pass Depth"),
            width,
            height,
        }
    }

    /// All attachments exist at the declared resolution
    pub fn is_complete(&self) -> bool {
        attachment_matches(&self.position, self.width, self.height)
            && attachment_matches(&self.depth, self.width, self.height)
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// The geometry pass target: three simultaneous color outputs plus depth
pub struct GBuffer {
    pub position: TextureResource,
    pub normal: TextureResource,
    pub albedo_spec: TextureResource,
    pub depth: TextureResource,
    width: u32,
    height: u32,
}

impl GBuffer {
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        Self {
            position: TextureResource::create_color_target(
                device,
                width,
                height,
                ATTACHMENT_FORMAT_FLOAT,
                "G-Buffer Position",
            ),
            normal: TextureResource::create_color_target(
                device,
                width,
                height,
                ATTACHMENT_FORMAT_FLOAT,
                "G-Buffer Normal",
            ),
            albedo_spec: TextureResource::create_color_target(
                device,
                width,
                height,
                ATTACHMENT_FORMAT_COLOR,
                "G-Buffer Albedo+Spec",
            ),
            depth: TextureResource::create_depth_target(device, width, height, "G-Buffer Depth"),
            width,
            height,
        }
    }

    pub fn is_complete(&self) -> bool {
        attachment_matches(&self.position, self.width, self.height)
            && attachment_matches(&self.normal, self.width, self.height)
            && attachment_matches(&self.albedo_spec, self.width, self.height)
            && attachment_matches(&self.depth, self.width, self.height)
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

fn attachment_matches(attachment: &TextureResource, width: u32, height: u32) -> bool {
    attachment.texture.width() == width && attachment.texture.height() == height
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deferred_buffers_use_float_precision_where_needed() {
        // Positions and normals need 16-bit float channels; albedo does not.
        assert_eq!(ATTACHMENT_FORMAT_FLOAT, wgpu::TextureFormat::Rgba16Float);
        assert_eq!(ATTACHMENT_FORMAT_COLOR, wgpu::TextureFormat::Rgba8Unorm);
        assert_eq!(
            TextureResource::DEPTH_FORMAT,
            wgpu::TextureFormat::Depth32Float
        );
    }
}
