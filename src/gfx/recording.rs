// gfx/recording.rs - headless graphics context that records every call
use std::collections::{HashMap, HashSet};
use std::num::NonZeroU32;

use glam::{BVec4, UVec2, Vec4};

use super::types::*;
use super::{GraphicsContext, GraphicsError};

/// One recorded graphics call. Object-creating calls carry the name they returned.
#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    CreateBuffer(BufferId),
    BindBuffer {
        target: BufferTarget,
        buffer: Option<BufferId>,
    },
    BufferData {
        target: BufferTarget,
        len: usize,
    },
    DeleteBuffer(BufferId),
    CreateVertexArray(VertexArrayId),
    BindVertexArray(Option<VertexArrayId>),
    VertexAttribute {
        attribute: VertexAttribute,
        stride: i32,
    },
    DeleteVertexArray(VertexArrayId),
    CreateTexture(TextureId),
    ActiveTexture(u32),
    BindTexture(Option<TextureId>),
    TexImage2d {
        format: TextureFormat,
        size: UVec2,
        has_pixels: bool,
    },
    GenerateMipmap,
    DeleteTexture(TextureId),
    CreateSampler(SamplerId),
    SamplerParameter {
        sampler: SamplerId,
        parameter: SamplerParameter,
    },
    BindSampler {
        unit: u32,
        sampler: Option<SamplerId>,
    },
    DeleteSampler(SamplerId),
    CreateShader {
        shader: ShaderId,
        stage: ShaderStage,
    },
    CompileShader(ShaderId),
    DeleteShader(ShaderId),
    CreateProgram(ProgramId),
    AttachShader {
        program: ProgramId,
        shader: ShaderId,
    },
    LinkProgram(ProgramId),
    UseProgram(Option<ProgramId>),
    /// A uniform upload, resolved back to the name it was looked up with.
    Uniform {
        name: String,
        value: UniformValue,
    },
    DeleteProgram(ProgramId),
    CreateFramebuffer(FramebufferId),
    BindFramebuffer(Option<FramebufferId>),
    FramebufferTexture {
        attachment: Attachment,
        texture: TextureId,
    },
    DeleteFramebuffer(FramebufferId),
    Viewport {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
    ClearColor(Vec4),
    ClearDepth(f32),
    Clear(ClearMask),
    SetCapability {
        capability: Capability,
        enabled: bool,
    },
    CullFace(Face),
    FrontFace(Winding),
    DepthFunc(CompareFunction),
    BlendEquation(BlendEquation),
    BlendFunc {
        source: BlendFactor,
        destination: BlendFactor,
    },
    BlendColor(Vec4),
    ColorMask(BVec4),
    DepthMask(bool),
    DrawElements {
        mode: PrimitiveMode,
        count: i32,
    },
    DrawArrays {
        mode: PrimitiveMode,
        first: i32,
        count: i32,
    },
}

impl GlCall {
    pub fn is_draw(&self) -> bool {
        matches!(self, GlCall::DrawElements { .. } | GlCall::DrawArrays { .. })
    }
}

/// A [`GraphicsContext`] with no GPU behind it.
///
/// Hands out sequential object names, keeps a per-kind set of live objects and
/// counts releases of names that were never created or were already released.
/// Uniform locations are stable per `(program, name)` pair so uploads can be
/// reported by name. Failure switches let tests drive the error paths of shader
/// compilation, program linking and framebuffer setup.
#[derive(Debug, Default)]
pub struct RecordingContext {
    calls: Vec<GlCall>,
    next_name: u32,
    live: HashMap<ObjectKind, HashSet<u32>>,
    created: HashMap<ObjectKind, usize>,
    invalid_releases: usize,
    uniform_names: HashMap<u32, String>,
    uniform_locations: HashMap<(u32, String), u32>,
    hidden_uniforms: HashSet<String>,
    fail_compile: bool,
    fail_link: bool,
    framebuffer_incomplete: bool,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent shader compilation fail.
    pub fn fail_compile(&mut self, fail: bool) {
        self.fail_compile = fail;
    }

    /// Makes every subsequent program link fail.
    pub fn fail_link(&mut self, fail: bool) {
        self.fail_link = fail;
    }

    pub fn set_framebuffer_complete(&mut self, complete: bool) {
        self.framebuffer_incomplete = !complete;
    }

    /// Makes lookups of `name` fail in every program, as if the shader did not use it.
    pub fn hide_uniform(&mut self, name: impl Into<String>) {
        self.hidden_uniforms.insert(name.into());
    }

    pub fn calls(&self) -> &[GlCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<GlCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn draw_calls(&self) -> usize {
        self.calls.iter().filter(|call| call.is_draw()).count()
    }

    /// Every value uploaded to a uniform called `name`, in call order.
    pub fn uniform_values(&self, name: &str) -> Vec<UniformValue> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                GlCall::Uniform { name: n, value } if n == name => Some(*value),
                _ => None,
            })
            .collect()
    }

    pub fn live_count(&self, kind: ObjectKind) -> usize {
        self.live.get(&kind).map_or(0, HashSet::len)
    }

    pub fn live_total(&self) -> usize {
        self.live.values().map(HashSet::len).sum()
    }

    pub fn created_count(&self, kind: ObjectKind) -> usize {
        self.created.get(&kind).copied().unwrap_or(0)
    }

    pub fn invalid_releases(&self) -> usize {
        self.invalid_releases
    }

    fn allocate(&mut self, kind: ObjectKind) -> NonZeroU32 {
        self.next_name += 1;
        let name = NonZeroU32::MIN.saturating_add(self.next_name - 1);
        self.live.entry(kind).or_default().insert(name.get());
        *self.created.entry(kind).or_default() += 1;
        name
    }

    fn release(&mut self, kind: ObjectKind, name: u32) {
        let removed = self
            .live
            .get_mut(&kind)
            .is_some_and(|names| names.remove(&name));
        if !removed {
            log::warn!("Release of unknown or already released {:?} {}", kind, name);
            self.invalid_releases += 1;
        }
    }

    fn is_live(&self, kind: ObjectKind, name: u32) -> bool {
        self.live
            .get(&kind)
            .is_some_and(|names| names.contains(&name))
    }
}

impl GraphicsContext for RecordingContext {
    fn create_buffer(&mut self) -> Result<BufferId, GraphicsError> {
        let id = BufferId(self.allocate(ObjectKind::Buffer));
        self.calls.push(GlCall::CreateBuffer(id));
        Ok(id)
    }

    fn bind_buffer(&mut self, target: BufferTarget, buffer: Option<BufferId>) {
        self.calls.push(GlCall::BindBuffer { target, buffer });
    }

    fn buffer_data(&mut self, target: BufferTarget, data: &[u8]) {
        self.calls.push(GlCall::BufferData {
            target,
            len: data.len(),
        });
    }

    fn delete_buffer(&mut self, buffer: BufferId) {
        self.release(ObjectKind::Buffer, buffer.get());
        self.calls.push(GlCall::DeleteBuffer(buffer));
    }

    fn create_vertex_array(&mut self) -> Result<VertexArrayId, GraphicsError> {
        let id = VertexArrayId(self.allocate(ObjectKind::VertexArray));
        self.calls.push(GlCall::CreateVertexArray(id));
        Ok(id)
    }

    fn bind_vertex_array(&mut self, vertex_array: Option<VertexArrayId>) {
        self.calls.push(GlCall::BindVertexArray(vertex_array));
    }

    fn vertex_attribute(&mut self, attribute: &VertexAttribute, stride: i32) {
        self.calls.push(GlCall::VertexAttribute {
            attribute: *attribute,
            stride,
        });
    }

    fn delete_vertex_array(&mut self, vertex_array: VertexArrayId) {
        self.release(ObjectKind::VertexArray, vertex_array.get());
        self.calls.push(GlCall::DeleteVertexArray(vertex_array));
    }

    fn create_texture(&mut self) -> Result<TextureId, GraphicsError> {
        let id = TextureId(self.allocate(ObjectKind::Texture));
        self.calls.push(GlCall::CreateTexture(id));
        Ok(id)
    }

    fn active_texture(&mut self, unit: u32) {
        self.calls.push(GlCall::ActiveTexture(unit));
    }

    fn bind_texture(&mut self, texture: Option<TextureId>) {
        self.calls.push(GlCall::BindTexture(texture));
    }

    fn tex_image_2d(&mut self, format: TextureFormat, size: UVec2, pixels: Option<&[u8]>) {
        self.calls.push(GlCall::TexImage2d {
            format,
            size,
            has_pixels: pixels.is_some(),
        });
    }

    fn generate_mipmap(&mut self) {
        self.calls.push(GlCall::GenerateMipmap);
    }

    fn delete_texture(&mut self, texture: TextureId) {
        self.release(ObjectKind::Texture, texture.get());
        self.calls.push(GlCall::DeleteTexture(texture));
    }

    fn create_sampler(&mut self) -> Result<SamplerId, GraphicsError> {
        let id = SamplerId(self.allocate(ObjectKind::Sampler));
        self.calls.push(GlCall::CreateSampler(id));
        Ok(id)
    }

    fn sampler_parameter(&mut self, sampler: SamplerId, parameter: SamplerParameter) {
        self.calls.push(GlCall::SamplerParameter { sampler, parameter });
    }

    fn bind_sampler(&mut self, unit: u32, sampler: Option<SamplerId>) {
        self.calls.push(GlCall::BindSampler { unit, sampler });
    }

    fn delete_sampler(&mut self, sampler: SamplerId) {
        self.release(ObjectKind::Sampler, sampler.get());
        self.calls.push(GlCall::DeleteSampler(sampler));
    }

    fn create_shader(&mut self, stage: ShaderStage) -> Result<ShaderId, GraphicsError> {
        let shader = ShaderId(self.allocate(ObjectKind::Shader));
        self.calls.push(GlCall::CreateShader { shader, stage });
        Ok(shader)
    }

    fn compile_shader(&mut self, shader: ShaderId, _source: &str) -> Result<(), String> {
        self.calls.push(GlCall::CompileShader(shader));
        if self.fail_compile {
            Err(format!("0:1(1): error: compilation of shader {} rejected", shader.get()))
        } else {
            Ok(())
        }
    }

    fn delete_shader(&mut self, shader: ShaderId) {
        self.release(ObjectKind::Shader, shader.get());
        self.calls.push(GlCall::DeleteShader(shader));
    }

    fn create_program(&mut self) -> Result<ProgramId, GraphicsError> {
        let id = ProgramId(self.allocate(ObjectKind::Program));
        self.calls.push(GlCall::CreateProgram(id));
        Ok(id)
    }

    fn attach_shader(&mut self, program: ProgramId, shader: ShaderId) {
        self.calls.push(GlCall::AttachShader { program, shader });
    }

    fn link_program(&mut self, program: ProgramId) -> Result<(), String> {
        self.calls.push(GlCall::LinkProgram(program));
        if self.fail_link {
            Err(format!("error: linking of program {} rejected", program.get()))
        } else {
            Ok(())
        }
    }

    fn use_program(&mut self, program: Option<ProgramId>) {
        self.calls.push(GlCall::UseProgram(program));
    }

    fn uniform_location(&mut self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        if self.hidden_uniforms.contains(name) || !self.is_live(ObjectKind::Program, program.get())
        {
            return None;
        }
        let key = (program.get(), name.to_string());
        if let Some(location) = self.uniform_locations.get(&key) {
            return Some(UniformLocation(*location));
        }
        let location = self.uniform_names.len() as u32;
        self.uniform_names.insert(location, name.to_string());
        self.uniform_locations.insert(key, location);
        Some(UniformLocation(location))
    }

    fn set_uniform(&mut self, location: UniformLocation, value: UniformValue) {
        match self.uniform_names.get(&location.0) {
            Some(name) => self.calls.push(GlCall::Uniform {
                name: name.clone(),
                value,
            }),
            None => log::warn!("Uniform upload to unknown location {}", location.0),
        }
    }

    fn delete_program(&mut self, program: ProgramId) {
        self.release(ObjectKind::Program, program.get());
        self.calls.push(GlCall::DeleteProgram(program));
    }

    fn create_framebuffer(&mut self) -> Result<FramebufferId, GraphicsError> {
        let id = FramebufferId(self.allocate(ObjectKind::Framebuffer));
        self.calls.push(GlCall::CreateFramebuffer(id));
        Ok(id)
    }

    fn bind_framebuffer(&mut self, framebuffer: Option<FramebufferId>) {
        self.calls.push(GlCall::BindFramebuffer(framebuffer));
    }

    fn framebuffer_texture(&mut self, attachment: Attachment, texture: TextureId) {
        self.calls
            .push(GlCall::FramebufferTexture { attachment, texture });
    }

    fn framebuffer_complete(&mut self) -> bool {
        !self.framebuffer_incomplete
    }

    fn delete_framebuffer(&mut self, framebuffer: FramebufferId) {
        self.release(ObjectKind::Framebuffer, framebuffer.get());
        self.calls.push(GlCall::DeleteFramebuffer(framebuffer));
    }

    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.calls.push(GlCall::Viewport {
            x,
            y,
            width,
            height,
        });
    }

    fn clear_color(&mut self, color: Vec4) {
        self.calls.push(GlCall::ClearColor(color));
    }

    fn clear_depth(&mut self, depth: f32) {
        self.calls.push(GlCall::ClearDepth(depth));
    }

    fn clear(&mut self, mask: ClearMask) {
        self.calls.push(GlCall::Clear(mask));
    }

    fn set_capability(&mut self, capability: Capability, enabled: bool) {
        self.calls
            .push(GlCall::SetCapability { capability, enabled });
    }

    fn cull_face(&mut self, face: Face) {
        self.calls.push(GlCall::CullFace(face));
    }

    fn front_face(&mut self, winding: Winding) {
        self.calls.push(GlCall::FrontFace(winding));
    }

    fn depth_func(&mut self, function: CompareFunction) {
        self.calls.push(GlCall::DepthFunc(function));
    }

    fn blend_equation(&mut self, equation: BlendEquation) {
        self.calls.push(GlCall::BlendEquation(equation));
    }

    fn blend_func(&mut self, source: BlendFactor, destination: BlendFactor) {
        self.calls.push(GlCall::BlendFunc {
            source,
            destination,
        });
    }

    fn blend_color(&mut self, color: Vec4) {
        self.calls.push(GlCall::BlendColor(color));
    }

    fn color_mask(&mut self, mask: BVec4) {
        self.calls.push(GlCall::ColorMask(mask));
    }

    fn depth_mask(&mut self, enabled: bool) {
        self.calls.push(GlCall::DepthMask(enabled));
    }

    fn draw_elements(&mut self, mode: PrimitiveMode, count: i32) {
        self.calls.push(GlCall::DrawElements { mode, count });
    }

    fn draw_arrays(&mut self, mode: PrimitiveMode, first: i32, count: i32) {
        self.calls.push(GlCall::DrawArrays { mode, first, count });
    }
}
