// gfx/gl_backend.rs - OpenGL backend over glow (native object names)

use glam::{BVec4, UVec2, Vec4};
use glow::HasContext;

use super::types::*;
use super::{GraphicsContext, GraphicsError};

/// [`GraphicsContext`] backed by a live OpenGL context.
///
/// The caller owns context creation (window, surface, make-current) and hands the
/// loaded `glow::Context` over. Every call assumes that context is current on the
/// calling thread.
pub struct GlowContext {
    gl: glow::Context,
}

impl GlowContext {
    pub fn new(gl: glow::Context) -> Self {
        let version = gl.version();
        log::info!(
            "OpenGL context: {}.{} (embedded: {}) {}",
            version.major,
            version.minor,
            version.is_embedded,
            version.vendor_info
        );
        Self { gl }
    }

    pub fn raw(&self) -> &glow::Context {
        &self.gl
    }
}

fn buffer_target(target: BufferTarget) -> u32 {
    match target {
        BufferTarget::Array => glow::ARRAY_BUFFER,
        BufferTarget::ElementArray => glow::ELEMENT_ARRAY_BUFFER,
    }
}

fn attribute_type(kind: AttributeType) -> u32 {
    match kind {
        AttributeType::Float => glow::FLOAT,
        AttributeType::UnsignedByte => glow::UNSIGNED_BYTE,
    }
}

fn filter(value: Filter) -> i32 {
    (match value {
        Filter::Nearest => glow::NEAREST,
        Filter::Linear => glow::LINEAR,
        Filter::NearestMipmapNearest => glow::NEAREST_MIPMAP_NEAREST,
        Filter::LinearMipmapNearest => glow::LINEAR_MIPMAP_NEAREST,
        Filter::NearestMipmapLinear => glow::NEAREST_MIPMAP_LINEAR,
        Filter::LinearMipmapLinear => glow::LINEAR_MIPMAP_LINEAR,
    }) as i32
}

fn wrap(value: Wrap) -> i32 {
    (match value {
        Wrap::Repeat => glow::REPEAT,
        Wrap::MirroredRepeat => glow::MIRRORED_REPEAT,
        Wrap::ClampToEdge => glow::CLAMP_TO_EDGE,
        Wrap::ClampToBorder => glow::CLAMP_TO_BORDER,
    }) as i32
}

fn capability(value: Capability) -> u32 {
    match value {
        Capability::CullFace => glow::CULL_FACE,
        Capability::DepthTest => glow::DEPTH_TEST,
        Capability::Blend => glow::BLEND,
    }
}

fn face(value: Face) -> u32 {
    match value {
        Face::Front => glow::FRONT,
        Face::Back => glow::BACK,
        Face::FrontAndBack => glow::FRONT_AND_BACK,
    }
}

fn winding(value: Winding) -> u32 {
    match value {
        Winding::Cw => glow::CW,
        Winding::Ccw => glow::CCW,
    }
}

fn compare_function(value: CompareFunction) -> u32 {
    match value {
        CompareFunction::Never => glow::NEVER,
        CompareFunction::Less => glow::LESS,
        CompareFunction::Equal => glow::EQUAL,
        CompareFunction::LessEqual => glow::LEQUAL,
        CompareFunction::Greater => glow::GREATER,
        CompareFunction::NotEqual => glow::NOTEQUAL,
        CompareFunction::GreaterEqual => glow::GEQUAL,
        CompareFunction::Always => glow::ALWAYS,
    }
}

fn blend_equation(value: BlendEquation) -> u32 {
    match value {
        BlendEquation::Add => glow::FUNC_ADD,
        BlendEquation::Subtract => glow::FUNC_SUBTRACT,
        BlendEquation::ReverseSubtract => glow::FUNC_REVERSE_SUBTRACT,
        BlendEquation::Min => glow::MIN,
        BlendEquation::Max => glow::MAX,
    }
}

fn blend_factor(value: BlendFactor) -> u32 {
    match value {
        BlendFactor::Zero => glow::ZERO,
        BlendFactor::One => glow::ONE,
        BlendFactor::SrcColor => glow::SRC_COLOR,
        BlendFactor::OneMinusSrcColor => glow::ONE_MINUS_SRC_COLOR,
        BlendFactor::DstColor => glow::DST_COLOR,
        BlendFactor::OneMinusDstColor => glow::ONE_MINUS_DST_COLOR,
        BlendFactor::SrcAlpha => glow::SRC_ALPHA,
        BlendFactor::OneMinusSrcAlpha => glow::ONE_MINUS_SRC_ALPHA,
        BlendFactor::DstAlpha => glow::DST_ALPHA,
        BlendFactor::OneMinusDstAlpha => glow::ONE_MINUS_DST_ALPHA,
        BlendFactor::ConstantColor => glow::CONSTANT_COLOR,
        BlendFactor::OneMinusConstantColor => glow::ONE_MINUS_CONSTANT_COLOR,
        BlendFactor::ConstantAlpha => glow::CONSTANT_ALPHA,
        BlendFactor::OneMinusConstantAlpha => glow::ONE_MINUS_CONSTANT_ALPHA,
    }
}

fn primitive_mode(mode: PrimitiveMode) -> u32 {
    match mode {
        PrimitiveMode::Triangles => glow::TRIANGLES,
        PrimitiveMode::Lines => glow::LINES,
        PrimitiveMode::Points => glow::POINTS,
    }
}

fn clear_bits(mask: ClearMask) -> u32 {
    let mut bits = 0;
    if mask.contains(ClearMask::COLOR) {
        bits |= glow::COLOR_BUFFER_BIT;
    }
    if mask.contains(ClearMask::DEPTH) {
        bits |= glow::DEPTH_BUFFER_BIT;
    }
    if mask.contains(ClearMask::STENCIL) {
        bits |= glow::STENCIL_BUFFER_BIT;
    }
    bits
}

// (internal format, pixel format, pixel type)
fn texture_format(format: TextureFormat) -> (i32, u32, u32) {
    match format {
        TextureFormat::Rgba8 => (glow::RGBA8 as i32, glow::RGBA, glow::UNSIGNED_BYTE),
        TextureFormat::Depth24 => (
            glow::DEPTH_COMPONENT24 as i32,
            glow::DEPTH_COMPONENT,
            glow::UNSIGNED_INT,
        ),
    }
}

fn is_complete_status(status: u32) -> bool {
    status == glow::FRAMEBUFFER_COMPLETE
}

impl GraphicsContext for GlowContext {
    fn create_buffer(&mut self) -> Result<BufferId, GraphicsError> {
        let buffer = unsafe { self.gl.create_buffer() }
            .map_err(|message| GraphicsError::creation(ObjectKind::Buffer, message))?;
        Ok(BufferId(buffer.0))
    }

    fn bind_buffer(&mut self, target: BufferTarget, buffer: Option<BufferId>) {
        unsafe {
            self.gl
                .bind_buffer(buffer_target(target), buffer.map(|b| glow::NativeBuffer(b.0)))
        };
    }

    fn buffer_data(&mut self, target: BufferTarget, data: &[u8]) {
        unsafe {
            self.gl
                .buffer_data_u8_slice(buffer_target(target), data, glow::STATIC_DRAW)
        };
    }

    fn delete_buffer(&mut self, buffer: BufferId) {
        unsafe { self.gl.delete_buffer(glow::NativeBuffer(buffer.0)) };
    }

    fn create_vertex_array(&mut self) -> Result<VertexArrayId, GraphicsError> {
        let vertex_array = unsafe { self.gl.create_vertex_array() }
            .map_err(|message| GraphicsError::creation(ObjectKind::VertexArray, message))?;
        Ok(VertexArrayId(vertex_array.0))
    }

    fn bind_vertex_array(&mut self, vertex_array: Option<VertexArrayId>) {
        unsafe {
            self.gl
                .bind_vertex_array(vertex_array.map(|v| glow::NativeVertexArray(v.0)))
        };
    }

    fn vertex_attribute(&mut self, attribute: &VertexAttribute, stride: i32) {
        unsafe {
            self.gl.enable_vertex_attrib_array(attribute.location);
            self.gl.vertex_attrib_pointer_f32(
                attribute.location,
                attribute.components,
                attribute_type(attribute.kind),
                attribute.normalized,
                stride,
                attribute.offset,
            );
        }
    }

    fn delete_vertex_array(&mut self, vertex_array: VertexArrayId) {
        unsafe {
            self.gl
                .delete_vertex_array(glow::NativeVertexArray(vertex_array.0))
        };
    }

    fn create_texture(&mut self) -> Result<TextureId, GraphicsError> {
        let texture = unsafe { self.gl.create_texture() }
            .map_err(|message| GraphicsError::creation(ObjectKind::Texture, message))?;
        Ok(TextureId(texture.0))
    }

    fn active_texture(&mut self, unit: u32) {
        unsafe { self.gl.active_texture(glow::TEXTURE0 + unit) };
    }

    fn bind_texture(&mut self, texture: Option<TextureId>) {
        unsafe {
            self.gl
                .bind_texture(glow::TEXTURE_2D, texture.map(|t| glow::NativeTexture(t.0)))
        };
    }

    fn tex_image_2d(&mut self, format: TextureFormat, size: UVec2, pixels: Option<&[u8]>) {
        if let Some(pixels) = pixels {
            let expected = format.byte_len(size);
            if pixels.len() != expected {
                log::error!(
                    "Refusing {:?} upload of {} bytes for {}x{} (needs {})",
                    format,
                    pixels.len(),
                    size.x,
                    size.y,
                    expected
                );
                return;
            }
        }
        let (internal_format, pixel_format, pixel_type) = texture_format(format);
        unsafe {
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                internal_format,
                size.x as i32,
                size.y as i32,
                0,
                pixel_format,
                pixel_type,
                pixels,
            )
        };
    }

    fn generate_mipmap(&mut self) {
        unsafe { self.gl.generate_mipmap(glow::TEXTURE_2D) };
    }

    fn delete_texture(&mut self, texture: TextureId) {
        unsafe { self.gl.delete_texture(glow::NativeTexture(texture.0)) };
    }

    fn create_sampler(&mut self) -> Result<SamplerId, GraphicsError> {
        let sampler = unsafe { self.gl.create_sampler() }
            .map_err(|message| GraphicsError::creation(ObjectKind::Sampler, message))?;
        Ok(SamplerId(sampler.0))
    }

    fn sampler_parameter(&mut self, sampler: SamplerId, parameter: SamplerParameter) {
        let sampler = glow::NativeSampler(sampler.0);
        unsafe {
            match parameter {
                SamplerParameter::MinFilter(value) => {
                    self.gl
                        .sampler_parameter_i32(sampler, glow::TEXTURE_MIN_FILTER, filter(value))
                }
                SamplerParameter::MagFilter(value) => {
                    self.gl
                        .sampler_parameter_i32(sampler, glow::TEXTURE_MAG_FILTER, filter(value))
                }
                SamplerParameter::WrapS(value) => {
                    self.gl
                        .sampler_parameter_i32(sampler, glow::TEXTURE_WRAP_S, wrap(value))
                }
                SamplerParameter::WrapT(value) => {
                    self.gl
                        .sampler_parameter_i32(sampler, glow::TEXTURE_WRAP_T, wrap(value))
                }
                SamplerParameter::MaxAnisotropy(value) => self.gl.sampler_parameter_f32(
                    sampler,
                    glow::TEXTURE_MAX_ANISOTROPY_EXT,
                    value,
                ),
                SamplerParameter::BorderColor(color) => {
                    let mut values = color.to_array();
                    self.gl.sampler_parameter_f32_slice(
                        sampler,
                        glow::TEXTURE_BORDER_COLOR,
                        &mut values,
                    )
                }
            }
        }
    }

    fn bind_sampler(&mut self, unit: u32, sampler: Option<SamplerId>) {
        unsafe {
            self.gl
                .bind_sampler(unit, sampler.map(|s| glow::NativeSampler(s.0)))
        };
    }

    fn delete_sampler(&mut self, sampler: SamplerId) {
        unsafe { self.gl.delete_sampler(glow::NativeSampler(sampler.0)) };
    }

    fn create_shader(&mut self, stage: ShaderStage) -> Result<ShaderId, GraphicsError> {
        let shader_type = match stage {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        };
        let shader = unsafe { self.gl.create_shader(shader_type) }
            .map_err(|message| GraphicsError::creation(ObjectKind::Shader, message))?;
        Ok(ShaderId(shader.0))
    }

    fn compile_shader(&mut self, shader: ShaderId, source: &str) -> Result<(), String> {
        let shader = glow::NativeShader(shader.0);
        unsafe {
            self.gl.shader_source(shader, source);
            self.gl.compile_shader(shader);
            if self.gl.get_shader_compile_status(shader) {
                Ok(())
            } else {
                Err(self.gl.get_shader_info_log(shader))
            }
        }
    }

    fn delete_shader(&mut self, shader: ShaderId) {
        unsafe { self.gl.delete_shader(glow::NativeShader(shader.0)) };
    }

    fn create_program(&mut self) -> Result<ProgramId, GraphicsError> {
        let program = unsafe { self.gl.create_program() }
            .map_err(|message| GraphicsError::creation(ObjectKind::Program, message))?;
        Ok(ProgramId(program.0))
    }

    fn attach_shader(&mut self, program: ProgramId, shader: ShaderId) {
        unsafe {
            self.gl
                .attach_shader(glow::NativeProgram(program.0), glow::NativeShader(shader.0))
        };
    }

    fn link_program(&mut self, program: ProgramId) -> Result<(), String> {
        let program = glow::NativeProgram(program.0);
        unsafe {
            self.gl.link_program(program);
            if self.gl.get_program_link_status(program) {
                Ok(())
            } else {
                Err(self.gl.get_program_info_log(program))
            }
        }
    }

    fn use_program(&mut self, program: Option<ProgramId>) {
        unsafe {
            self.gl
                .use_program(program.map(|p| glow::NativeProgram(p.0)))
        };
    }

    fn uniform_location(&mut self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        unsafe {
            self.gl
                .get_uniform_location(glow::NativeProgram(program.0), name)
        }
        .map(|location| UniformLocation(location.0))
    }

    fn set_uniform(&mut self, location: UniformLocation, value: UniformValue) {
        let location = glow::NativeUniformLocation(location.0);
        let location = Some(&location);
        unsafe {
            match value {
                UniformValue::Int(v) => self.gl.uniform_1_i32(location, v),
                UniformValue::Float(v) => self.gl.uniform_1_f32(location, v),
                UniformValue::Vec2(v) => self.gl.uniform_2_f32(location, v.x, v.y),
                UniformValue::Vec3(v) => self.gl.uniform_3_f32(location, v.x, v.y, v.z),
                UniformValue::Vec4(v) => self.gl.uniform_4_f32(location, v.x, v.y, v.z, v.w),
                UniformValue::Mat4(m) => {
                    self.gl
                        .uniform_matrix_4_f32_slice(location, false, &m.to_cols_array())
                }
            }
        }
    }

    fn delete_program(&mut self, program: ProgramId) {
        unsafe { self.gl.delete_program(glow::NativeProgram(program.0)) };
    }

    fn create_framebuffer(&mut self) -> Result<FramebufferId, GraphicsError> {
        let framebuffer = unsafe { self.gl.create_framebuffer() }
            .map_err(|message| GraphicsError::creation(ObjectKind::Framebuffer, message))?;
        Ok(FramebufferId(framebuffer.0))
    }

    fn bind_framebuffer(&mut self, framebuffer: Option<FramebufferId>) {
        unsafe {
            self.gl.bind_framebuffer(
                glow::DRAW_FRAMEBUFFER,
                framebuffer.map(|f| glow::NativeFramebuffer(f.0)),
            )
        };
    }

    fn framebuffer_texture(&mut self, attachment: Attachment, texture: TextureId) {
        let attachment = match attachment {
            Attachment::Color0 => glow::COLOR_ATTACHMENT0,
            Attachment::Depth => glow::DEPTH_ATTACHMENT,
        };
        unsafe {
            self.gl.framebuffer_texture_2d(
                glow::DRAW_FRAMEBUFFER,
                attachment,
                glow::TEXTURE_2D,
                Some(glow::NativeTexture(texture.0)),
                0,
            )
        };
    }

    fn framebuffer_complete(&mut self) -> bool {
        let status = unsafe { self.gl.check_framebuffer_status(glow::DRAW_FRAMEBUFFER) };
        is_complete_status(status)
    }

    fn delete_framebuffer(&mut self, framebuffer: FramebufferId) {
        unsafe {
            self.gl
                .delete_framebuffer(glow::NativeFramebuffer(framebuffer.0))
        };
    }

    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { self.gl.viewport(x, y, width, height) };
    }

    fn clear_color(&mut self, color: Vec4) {
        unsafe { self.gl.clear_color(color.x, color.y, color.z, color.w) };
    }

    fn clear_depth(&mut self, depth: f32) {
        unsafe { self.gl.clear_depth_f32(depth) };
    }

    fn clear(&mut self, mask: ClearMask) {
        unsafe { self.gl.clear(clear_bits(mask)) };
    }

    fn set_capability(&mut self, value: Capability, enabled: bool) {
        unsafe {
            if enabled {
                self.gl.enable(capability(value));
            } else {
                self.gl.disable(capability(value));
            }
        }
    }

    fn cull_face(&mut self, value: Face) {
        unsafe { self.gl.cull_face(face(value)) };
    }

    fn front_face(&mut self, value: Winding) {
        unsafe { self.gl.front_face(winding(value)) };
    }

    fn depth_func(&mut self, function: CompareFunction) {
        unsafe { self.gl.depth_func(compare_function(function)) };
    }

    fn blend_equation(&mut self, equation: BlendEquation) {
        unsafe { self.gl.blend_equation(blend_equation(equation)) };
    }

    fn blend_func(&mut self, source: BlendFactor, destination: BlendFactor) {
        unsafe {
            self.gl
                .blend_func(blend_factor(source), blend_factor(destination))
        };
    }

    fn blend_color(&mut self, color: Vec4) {
        unsafe { self.gl.blend_color(color.x, color.y, color.z, color.w) };
    }

    fn color_mask(&mut self, mask: BVec4) {
        unsafe { self.gl.color_mask(mask.x, mask.y, mask.z, mask.w) };
    }

    fn depth_mask(&mut self, enabled: bool) {
        unsafe { self.gl.depth_mask(enabled) };
    }

    fn draw_elements(&mut self, mode: PrimitiveMode, count: i32) {
        unsafe {
            self.gl
                .draw_elements(primitive_mode(mode), count, glow::UNSIGNED_INT, 0)
        };
    }

    fn draw_arrays(&mut self, mode: PrimitiveMode, first: i32, count: i32) {
        unsafe { self.gl.draw_arrays(primitive_mode(mode), first, count) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_mask_maps_to_gl_bits() {
        assert_eq!(
            clear_bits(ClearMask::COLOR | ClearMask::DEPTH),
            glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT
        );
        assert_eq!(clear_bits(ClearMask::empty()), 0);
    }

    #[test]
    fn only_complete_status_counts_as_complete() {
        assert!(is_complete_status(glow::FRAMEBUFFER_COMPLETE));
        assert!(!is_complete_status(glow::FRAMEBUFFER_INCOMPLETE_ATTACHMENT));
        assert!(!is_complete_status(glow::FRAMEBUFFER_UNSUPPORTED));
    }

    #[test]
    fn depth_target_uses_24_bit_internal_format() {
        let (internal, format, _) = texture_format(TextureFormat::Depth24);
        assert_eq!(internal, glow::DEPTH_COMPONENT24 as i32);
        assert_eq!(format, glow::DEPTH_COMPONENT);
    }
}
