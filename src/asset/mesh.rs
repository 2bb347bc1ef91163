use crate::gfx::{
    BufferId, BufferTarget, GraphicsContext, GraphicsError, PrimitiveMode, VertexArrayId,
};
use crate::renderer::Vertex;

use super::GpuResource;

/// Indexed triangle mesh: one vertex array, one vertex buffer and one element buffer.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Mesh {
    vertex_array: VertexArrayId,
    vertex_buffer: BufferId,
    element_buffer: BufferId,
    element_count: i32,
}

impl Mesh {
    pub fn from_vertices(
        gl: &mut dyn GraphicsContext,
        vertices: &[Vertex],
        indices: &[u32],
    ) -> Result<Self, GraphicsError> {
        let vertex_array = gl.create_vertex_array()?;
        let vertex_buffer = match gl.create_buffer() {
            Ok(buffer) => buffer,
            Err(err) => {
                gl.delete_vertex_array(vertex_array);
                return Err(err);
            }
        };
        let element_buffer = match gl.create_buffer() {
            Ok(buffer) => buffer,
            Err(err) => {
                gl.delete_buffer(vertex_buffer);
                gl.delete_vertex_array(vertex_array);
                return Err(err);
            }
        };

        gl.bind_vertex_array(Some(vertex_array));

        gl.bind_buffer(BufferTarget::Array, Some(vertex_buffer));
        gl.buffer_data(BufferTarget::Array, bytemuck::cast_slice(vertices));
        for attribute in &Vertex::ATTRIBUTES {
            gl.vertex_attribute(attribute, Vertex::STRIDE);
        }

        gl.bind_buffer(BufferTarget::ElementArray, Some(element_buffer));
        gl.buffer_data(BufferTarget::ElementArray, bytemuck::cast_slice(indices));

        // The element buffer binding is vertex array state; unbind the array first.
        gl.bind_vertex_array(None);
        gl.bind_buffer(BufferTarget::Array, None);

        Ok(Self {
            vertex_array,
            vertex_buffer,
            element_buffer,
            element_count: indices.len() as i32,
        })
    }

    /// Binds the vertex array and issues one indexed draw over all elements.
    pub fn draw(&self, gl: &mut dyn GraphicsContext) {
        gl.bind_vertex_array(Some(self.vertex_array));
        gl.draw_elements(PrimitiveMode::Triangles, self.element_count);
    }

    pub fn element_count(&self) -> i32 {
        self.element_count
    }
}

impl GpuResource for Mesh {
    fn release(self, gl: &mut dyn GraphicsContext) {
        gl.delete_vertex_array(self.vertex_array);
        gl.delete_buffer(self.vertex_buffer);
        gl.delete_buffer(self.element_buffer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{GlCall, ObjectKind, RecordingContext};
    use crate::renderer::primitives::cube_mesh;

    #[test]
    fn upload_and_release_balance() {
        let mut gl = RecordingContext::new();
        let (vertices, indices) = cube_mesh();
        let mesh = Mesh::from_vertices(&mut gl, &vertices, &indices).unwrap();
        assert_eq!(mesh.element_count(), 36);
        assert_eq!(gl.live_count(ObjectKind::Buffer), 2);
        assert_eq!(gl.live_count(ObjectKind::VertexArray), 1);

        mesh.release(&mut gl);
        assert_eq!(gl.live_total(), 0);
        assert_eq!(gl.invalid_releases(), 0);
    }

    #[test]
    fn vertex_data_is_uploaded_with_layout() {
        let mut gl = RecordingContext::new();
        let (vertices, indices) = cube_mesh();
        let mesh = Mesh::from_vertices(&mut gl, &vertices, &indices).unwrap();

        let attributes = gl
            .calls()
            .iter()
            .filter(|call| matches!(call, GlCall::VertexAttribute { .. }))
            .count();
        assert_eq!(attributes, 4);
        assert!(gl.calls().contains(&GlCall::BufferData {
            target: BufferTarget::Array,
            len: vertices.len() * Vertex::STRIDE as usize,
        }));
        assert!(gl.calls().contains(&GlCall::BufferData {
            target: BufferTarget::ElementArray,
            len: indices.len() * 4,
        }));

        gl.clear_calls();
        mesh.draw(&mut gl);
        assert_eq!(
            gl.calls().last(),
            Some(&GlCall::DrawElements {
                mode: PrimitiveMode::Triangles,
                count: 36
            })
        );
        mesh.release(&mut gl);
    }
}
