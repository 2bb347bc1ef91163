pub mod commands;
pub mod framebuffer;
pub mod material;
pub mod pipeline_state;
pub mod primitives;
pub mod renderer;
pub mod sampler;
pub mod shader;
pub mod texture;
pub mod vertex;

use std::path::PathBuf;

pub use commands::RenderCommand;
pub use framebuffer::Framebuffer;
pub use material::{Material, MaterialKind, TextureBinding};
pub use pipeline_state::{PipelineState, StateEffect};
pub use primitives::{cube_mesh, plane_mesh, sphere_mesh};
pub use renderer::{ForwardRenderer, FrameStats, ALWAYS_BEHIND};
pub use sampler::{Sampler, SamplerConfig};
pub use shader::ShaderProgram;
pub use texture::Texture;
pub use vertex::Vertex;

use crate::gfx::{GraphicsError, ShaderStage};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Graphics(#[from] GraphicsError),
    #[error("failed to read shader {path:?}: {source}")]
    ShaderIo {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to compile {stage:?} shader {origin}: {log}")]
    ShaderCompile {
        stage: ShaderStage,
        origin: String,
        log: String,
    },
    #[error("failed to link shader program: {log}")]
    ShaderLink { log: String },
    #[error("failed to load texture {path:?}: {source}")]
    TextureLoad {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("offscreen framebuffer is incomplete")]
    IncompleteFramebuffer,
}
