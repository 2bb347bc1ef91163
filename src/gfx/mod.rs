//! Immediate-mode graphics context.
//!
//! Everything the renderer does to the GPU goes through [`GraphicsContext`]. Calls are
//! issued in program order and never wait on the GPU. Two implementations ship with
//! the crate: [`GlowContext`] drives a real OpenGL 3.3 / GLES 3 context and
//! [`RecordingContext`] records the call stream for tests and dry runs.

pub mod gl_backend;
pub mod recording;
pub mod types;

pub use gl_backend::GlowContext;
pub use recording::{GlCall, RecordingContext};
pub use types::*;

use glam::{BVec4, UVec2, Vec4};

#[derive(Debug, thiserror::Error)]
pub enum GraphicsError {
    #[error("failed to create {kind:?} object: {message}")]
    Creation { kind: ObjectKind, message: String },
    #[error("{format:?} upload of {size} needs {expected} bytes, got {actual}")]
    PixelDataSize {
        format: TextureFormat,
        size: UVec2,
        expected: usize,
        actual: usize,
    },
}

impl GraphicsError {
    pub fn creation(kind: ObjectKind, message: impl Into<String>) -> Self {
        Self::Creation {
            kind,
            message: message.into(),
        }
    }
}

/// The subset of an OpenGL-style API the engine relies on.
///
/// Texture calls act on the `TEXTURE_2D` target of the active unit and framebuffer
/// calls act on the draw framebuffer. `None` in a bind call restores the default
/// object (for framebuffers: the presentation target).
pub trait GraphicsContext {
    fn create_buffer(&mut self) -> Result<BufferId, GraphicsError>;
    fn bind_buffer(&mut self, target: BufferTarget, buffer: Option<BufferId>);
    fn buffer_data(&mut self, target: BufferTarget, data: &[u8]);
    fn delete_buffer(&mut self, buffer: BufferId);

    fn create_vertex_array(&mut self) -> Result<VertexArrayId, GraphicsError>;
    fn bind_vertex_array(&mut self, vertex_array: Option<VertexArrayId>);
    /// Enables `attribute` on the bound vertex array, sourcing the bound array buffer.
    fn vertex_attribute(&mut self, attribute: &VertexAttribute, stride: i32);
    fn delete_vertex_array(&mut self, vertex_array: VertexArrayId);

    fn create_texture(&mut self) -> Result<TextureId, GraphicsError>;
    fn active_texture(&mut self, unit: u32);
    fn bind_texture(&mut self, texture: Option<TextureId>);
    fn tex_image_2d(&mut self, format: TextureFormat, size: UVec2, pixels: Option<&[u8]>);
    fn generate_mipmap(&mut self);
    fn delete_texture(&mut self, texture: TextureId);

    fn create_sampler(&mut self) -> Result<SamplerId, GraphicsError>;
    fn sampler_parameter(&mut self, sampler: SamplerId, parameter: SamplerParameter);
    fn bind_sampler(&mut self, unit: u32, sampler: Option<SamplerId>);
    fn delete_sampler(&mut self, sampler: SamplerId);

    fn create_shader(&mut self, stage: ShaderStage) -> Result<ShaderId, GraphicsError>;
    /// Uploads and compiles `source`. On failure returns the info log.
    fn compile_shader(&mut self, shader: ShaderId, source: &str) -> Result<(), String>;
    fn delete_shader(&mut self, shader: ShaderId);
    fn create_program(&mut self) -> Result<ProgramId, GraphicsError>;
    fn attach_shader(&mut self, program: ProgramId, shader: ShaderId);
    /// Links `program`. On failure returns the info log.
    fn link_program(&mut self, program: ProgramId) -> Result<(), String>;
    fn use_program(&mut self, program: Option<ProgramId>);
    fn uniform_location(&mut self, program: ProgramId, name: &str) -> Option<UniformLocation>;
    /// Uploads to the program currently in use.
    fn set_uniform(&mut self, location: UniformLocation, value: UniformValue);
    fn delete_program(&mut self, program: ProgramId);

    fn create_framebuffer(&mut self) -> Result<FramebufferId, GraphicsError>;
    fn bind_framebuffer(&mut self, framebuffer: Option<FramebufferId>);
    fn framebuffer_texture(&mut self, attachment: Attachment, texture: TextureId);
    fn framebuffer_complete(&mut self) -> bool;
    fn delete_framebuffer(&mut self, framebuffer: FramebufferId);

    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32);
    fn clear_color(&mut self, color: Vec4);
    fn clear_depth(&mut self, depth: f32);
    fn clear(&mut self, mask: ClearMask);
    fn set_capability(&mut self, capability: Capability, enabled: bool);
    fn cull_face(&mut self, face: Face);
    fn front_face(&mut self, winding: Winding);
    fn depth_func(&mut self, function: CompareFunction);
    fn blend_equation(&mut self, equation: BlendEquation);
    fn blend_func(&mut self, source: BlendFactor, destination: BlendFactor);
    fn blend_color(&mut self, color: Vec4);
    fn color_mask(&mut self, mask: BVec4);
    fn depth_mask(&mut self, enabled: bool);

    /// Draws `count` `u32` indices from the bound element buffer.
    fn draw_elements(&mut self, mode: PrimitiveMode, count: i32);
    fn draw_arrays(&mut self, mode: PrimitiveMode, first: i32, count: i32);
}
