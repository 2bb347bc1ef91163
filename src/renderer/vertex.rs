use bytemuck::{Pod, Zeroable};
use std::mem;

use crate::gfx::{AttributeType, VertexAttribute};

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable, Debug, PartialEq)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [u8; 4],
    pub tex_coord: [f32; 2],
    pub normal: [f32; 3],
}

impl Vertex {
    pub const STRIDE: i32 = mem::size_of::<Vertex>() as i32;

    pub const ATTRIBUTES: [VertexAttribute; 4] = [
        VertexAttribute {
            location: 0,
            components: 3,
            kind: AttributeType::Float,
            normalized: false,
            offset: mem::offset_of!(Vertex, position) as i32,
        },
        VertexAttribute {
            location: 1,
            components: 4,
            kind: AttributeType::UnsignedByte,
            normalized: true,
            offset: mem::offset_of!(Vertex, color) as i32,
        },
        VertexAttribute {
            location: 2,
            components: 2,
            kind: AttributeType::Float,
            normalized: false,
            offset: mem::offset_of!(Vertex, tex_coord) as i32,
        },
        VertexAttribute {
            location: 3,
            components: 3,
            kind: AttributeType::Float,
            normalized: false,
            offset: mem::offset_of!(Vertex, normal) as i32,
        },
    ];
}

pub const WHITE: [u8; 4] = [255, 255, 255, 255];

#[inline]
pub fn v(position: [f32; 3], tex_coord: [f32; 2], normal: [f32; 3]) -> Vertex {
    Vertex {
        position,
        color: WHITE,
        tex_coord,
        normal,
    }
}
