use std::num::NonZeroU32;

use glam::{Mat4, Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

macro_rules! object_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(pub NonZeroU32);

        impl $name {
            pub fn get(self) -> u32 {
                self.0.get()
            }
        }
    };
}

object_id!(
    /// Name of a vertex or element buffer object.
    BufferId
);
object_id!(
    /// Name of a vertex array object.
    VertexArrayId
);
object_id!(
    /// Name of a 2D texture object.
    TextureId
);
object_id!(
    /// Name of a sampler object.
    SamplerId
);
object_id!(ShaderId);
object_id!(ProgramId);
object_id!(FramebufferId);

/// Location of a named uniform inside the program it was looked up from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub u32);

/// The kinds of GPU objects a context hands out, used for leak accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Buffer,
    VertexArray,
    Texture,
    Sampler,
    Shader,
    Program,
    Framebuffer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    Array,
    ElementArray,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeType {
    Float,
    UnsignedByte,
}

/// One entry of a vertex layout descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub location: u32,
    pub components: i32,
    pub kind: AttributeType,
    pub normalized: bool,
    pub offset: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    Rgba8,
    Depth24,
}

impl TextureFormat {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            TextureFormat::Rgba8 => 4,
            // DEPTH_COMPONENT uploaded as UNSIGNED_INT
            TextureFormat::Depth24 => 4,
        }
    }

    /// Bytes of pixel data a full upload of `size` needs.
    pub fn byte_len(self, size: glam::UVec2) -> usize {
        size.x as usize * size.y as usize * self.bytes_per_pixel()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    #[serde(alias = "GL_NEAREST")]
    Nearest,
    #[serde(alias = "GL_LINEAR")]
    Linear,
    #[serde(alias = "GL_NEAREST_MIPMAP_NEAREST")]
    NearestMipmapNearest,
    #[serde(alias = "GL_LINEAR_MIPMAP_NEAREST")]
    LinearMipmapNearest,
    #[serde(alias = "GL_NEAREST_MIPMAP_LINEAR")]
    NearestMipmapLinear,
    #[serde(alias = "GL_LINEAR_MIPMAP_LINEAR")]
    LinearMipmapLinear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Wrap {
    #[serde(alias = "GL_REPEAT")]
    Repeat,
    #[serde(alias = "GL_MIRRORED_REPEAT")]
    MirroredRepeat,
    #[serde(alias = "GL_CLAMP_TO_EDGE")]
    ClampToEdge,
    #[serde(alias = "GL_CLAMP_TO_BORDER")]
    ClampToBorder,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SamplerParameter {
    MinFilter(Filter),
    MagFilter(Filter),
    WrapS(Wrap),
    WrapT(Wrap),
    MaxAnisotropy(f32),
    BorderColor(Vec4),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat4(Mat4),
}

impl From<i32> for UniformValue {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<f32> for UniformValue {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<Vec2> for UniformValue {
    fn from(value: Vec2) -> Self {
        Self::Vec2(value)
    }
}

impl From<Vec3> for UniformValue {
    fn from(value: Vec3) -> Self {
        Self::Vec3(value)
    }
}

impl From<Vec4> for UniformValue {
    fn from(value: Vec4) -> Self {
        Self::Vec4(value)
    }
}

impl From<Mat4> for UniformValue {
    fn from(value: Mat4) -> Self {
        Self::Mat4(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attachment {
    Color0,
    Depth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    CullFace,
    DepthTest,
    Blend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Face {
    #[serde(alias = "GL_FRONT")]
    Front,
    #[serde(alias = "GL_BACK")]
    Back,
    #[serde(alias = "GL_FRONT_AND_BACK")]
    FrontAndBack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Winding {
    #[serde(alias = "GL_CW")]
    Cw,
    #[serde(alias = "GL_CCW")]
    Ccw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareFunction {
    #[serde(alias = "GL_NEVER")]
    Never,
    #[serde(alias = "GL_LESS")]
    Less,
    #[serde(alias = "GL_EQUAL")]
    Equal,
    #[serde(alias = "GL_LEQUAL")]
    LessEqual,
    #[serde(alias = "GL_GREATER")]
    Greater,
    #[serde(alias = "GL_NOTEQUAL")]
    NotEqual,
    #[serde(alias = "GL_GEQUAL")]
    GreaterEqual,
    #[serde(alias = "GL_ALWAYS")]
    Always,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendEquation {
    #[serde(alias = "GL_FUNC_ADD")]
    Add,
    #[serde(alias = "GL_FUNC_SUBTRACT")]
    Subtract,
    #[serde(alias = "GL_FUNC_REVERSE_SUBTRACT")]
    ReverseSubtract,
    #[serde(alias = "GL_MIN")]
    Min,
    #[serde(alias = "GL_MAX")]
    Max,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendFactor {
    #[serde(alias = "GL_ZERO")]
    Zero,
    #[serde(alias = "GL_ONE")]
    One,
    #[serde(alias = "GL_SRC_COLOR")]
    SrcColor,
    #[serde(alias = "GL_ONE_MINUS_SRC_COLOR")]
    OneMinusSrcColor,
    #[serde(alias = "GL_DST_COLOR")]
    DstColor,
    #[serde(alias = "GL_ONE_MINUS_DST_COLOR")]
    OneMinusDstColor,
    #[serde(alias = "GL_SRC_ALPHA")]
    SrcAlpha,
    #[serde(alias = "GL_ONE_MINUS_SRC_ALPHA")]
    OneMinusSrcAlpha,
    #[serde(alias = "GL_DST_ALPHA")]
    DstAlpha,
    #[serde(alias = "GL_ONE_MINUS_DST_ALPHA")]
    OneMinusDstAlpha,
    #[serde(alias = "GL_CONSTANT_COLOR")]
    ConstantColor,
    #[serde(alias = "GL_ONE_MINUS_CONSTANT_COLOR")]
    OneMinusConstantColor,
    #[serde(alias = "GL_CONSTANT_ALPHA")]
    ConstantAlpha,
    #[serde(alias = "GL_ONE_MINUS_CONSTANT_ALPHA")]
    OneMinusConstantAlpha,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveMode {
    Triangles,
    Lines,
    Points,
}

bitflags::bitflags! {
    /// Buffers affected by a clear.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClearMask: u32 {
        const COLOR = 1 << 0;
        const DEPTH = 1 << 1;
        const STENCIL = 1 << 2;
    }
}
