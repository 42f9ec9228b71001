//! GPU resource management: textures and per-pass uniform data.

pub mod pass_uniforms;
pub mod texture_resource;

pub use pass_uniforms::{PassUbo, PassUniforms};
pub use texture_resource::TextureResource;
