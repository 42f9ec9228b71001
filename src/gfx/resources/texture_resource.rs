//! Texture resource management for wgpu
//!
//! Creates and bundles the textures the pipeline needs: offscreen color and
//! depth attachments for the render targets, and sampled images loaded from
//! disk (with procedural fallbacks when an asset is missing).

use std::path::Path;

use log::warn;

/// GPU texture resource containing texture, view, and sampler
pub struct TextureResource {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl TextureResource {
    /// Standard depth buffer format used throughout the renderer
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Creates an offscreen color attachment that can also be sampled.
    ///
    /// Nearest filtering: the deferred buffers hold positions and normals,
    /// which must never be interpolated between texels.
    pub fn create_color_target(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
        label: &str,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", label)),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Creates a depth attachment for an offscreen render target
    pub fn create_depth_target(device: &wgpu::Device, width: u32, height: u32, label: &str) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", label)),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Creates a sampled 2D texture from raw RGBA8 data (4 bytes per pixel)
    pub fn create_from_rgba_data(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &[u8],
        width: u32,
        height: u32,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", label)),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Loads a sampleable image from disk, falling back to the provided
    /// procedural pixels when the file is missing or undecodable.
    ///
    /// Asset failures never abort the run; the fallback keeps the pipeline
    /// rendering something visibly placeholder-ish instead.
    pub fn load_from_file_or(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: &str,
        fallback: (Vec<u8>, u32, u32),
        label: &str,
    ) -> Self {
        match image::open(Path::new(path)) {
            Ok(img) => {
                let rgba = img.to_rgba8();
                let (width, height) = rgba.dimensions();
                Self::create_from_rgba_data(device, queue, &rgba, width, height, label)
            }
            Err(err) => {
                warn!("texture '{path}' failed to load ({err}); using procedural fallback");
                let (pixels, width, height) = fallback;
                Self::create_from_rgba_data(device, queue, &pixels, width, height, label)
            }
        }
    }
}

/// Solid-color RGBA pixels, used as the diffuse fallback
pub fn solid_color_pixels(rgba: [u8; 4], width: u32, height: u32) -> (Vec<u8>, u32, u32) {
    let mut pixels = Vec::with_capacity((width * height * 4) as usize);
    for _ in 0..width * height {
        pixels.extend_from_slice(&rgba);
    }
    (pixels, width, height)
}

/// Deterministic grayscale noise used as the fur-pattern fallback.
///
/// A hash of the texel coordinate drives the value, so the pattern is
/// identical across runs without pulling in a random number generator.
pub fn noise_pattern_pixels(size: u32) -> (Vec<u8>, u32, u32) {
    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let mut h = x.wrapping_mul(374_761_393).wrapping_add(y.wrapping_mul(668_265_263));
            h = (h ^ (h >> 13)).wrapping_mul(1_274_126_177);
            h ^= h >> 16;
            let value = (h & 0xff) as u8;
            pixels.extend_from_slice(&[value, value, value, 255]);
        }
    }
    (pixels, size, size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_color_fills_every_pixel() {
        let (pixels, w, h) = solid_color_pixels([10, 20, 30, 255], 4, 2);
        assert_eq!(pixels.len(), (w * h * 4) as usize);
        assert_eq!(&pixels[0..4], &[10, 20, 30, 255]);
        assert_eq!(&pixels[pixels.len() - 4..], &[10, 20, 30, 255]);
    }

    #[test]
    fn noise_pattern_is_deterministic() {
        let (a, _, _) = noise_pattern_pixels(32);
        let (b, _, _) = noise_pattern_pixels(32);
        assert_eq!(a, b);

        // Not a constant image.
        let first = a[0];
        assert!(a.chunks(4).any(|px| px[0] != first));
    }
}
