use gl::types::*;
use log::trace;
use std::mem::size_of;

use super::context::GlContext;
use super::driver::ShaderDriver;
use super::shaders::ShaderProgram;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    /// `layout (location = N)` in the vertex shader.
    pub location: u32,
    /// Number of floats.
    pub components: i32,
}

/// Interleaved float vertex format.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexLayout {
    attributes: Vec<VertexAttribute>,
}

impl VertexLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an attribute after the ones already declared.
    pub fn with(mut self, location: u32, components: i32) -> Self {
        self.attributes.push(VertexAttribute {
            location,
            components,
        });
        self
    }

    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }

    pub fn floats_per_vertex(&self) -> usize {
        self.attributes.iter().map(|a| a.components as usize).sum()
    }

    pub fn stride(&self) -> usize {
        self.floats_per_vertex() * size_of::<f32>()
    }

    /// Byte offset of each attribute inside one vertex.
    pub fn offsets(&self) -> Vec<usize> {
        self.attributes
            .iter()
            .scan(0usize, |offset, a| {
                let current = *offset;
                *offset += a.components as usize * size_of::<f32>();
                Some(current)
            })
            .collect()
    }
}

/// Vertex array object with its vertex buffer and optional element buffer.
pub struct Mesh {
    _ctx: GlContext,
    vao: GLuint,
    vbo: GLuint,
    ebo: Option<GLuint>,
    count: i32,
}

impl Mesh {
    pub fn new(
        ctx: &GlContext,
        vertices: &[f32],
        indices: Option<&[u32]>,
        layout: &VertexLayout,
    ) -> Self {
        let per_vertex = layout.floats_per_vertex().max(1);
        let count = match indices {
            Some(indices) => indices.len(),
            None => vertices.len() / per_vertex,
        } as i32;

        let mut vao = 0;
        let mut vbo = 0;
        let mut ebo = None;
        unsafe {
            gl::GenVertexArrays(1, &mut vao);
            gl::BindVertexArray(vao);

            if let Some(indices) = indices {
                let mut id = 0;
                gl::GenBuffers(1, &mut id);
                gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, id);
                let bytes: &[u8] = bytemuck::cast_slice(indices);
                gl::BufferData(
                    gl::ELEMENT_ARRAY_BUFFER,
                    bytes.len() as GLsizeiptr,
                    bytes.as_ptr() as *const _,
                    gl::STATIC_DRAW,
                );
                ebo = Some(id);
            }

            gl::GenBuffers(1, &mut vbo);
            gl::BindBuffer(gl::ARRAY_BUFFER, vbo);
            let bytes: &[u8] = bytemuck::cast_slice(vertices);
            gl::BufferData(
                gl::ARRAY_BUFFER,
                bytes.len() as GLsizeiptr,
                bytes.as_ptr() as *const _,
                gl::STATIC_DRAW,
            );

            let stride = layout.stride() as GLsizei;
            for (attribute, offset) in layout.attributes().iter().zip(layout.offsets()) {
                gl::VertexAttribPointer(
                    attribute.location,
                    attribute.components,
                    gl::FLOAT,
                    gl::FALSE,
                    stride,
                    offset as *const _,
                );
                gl::EnableVertexAttribArray(attribute.location);
            }

            // The element buffer binding is part of the VAO, so only the
            // array buffer is reset here.
            gl::BindVertexArray(0);
            gl::BindBuffer(gl::ARRAY_BUFFER, 0);
        }

        Self {
            _ctx: *ctx,
            vao,
            vbo,
            ebo,
            count,
        }
    }

    pub fn is_indexed(&self) -> bool {
        self.ebo.is_some()
    }

    /// Activates `program` and draws the mesh as triangles.
    pub fn draw<D: ShaderDriver>(&self, ctx: &GlContext, program: &ShaderProgram<D>) {
        program.set_used();
        unsafe {
            gl::BindVertexArray(self.vao);
            if self.is_indexed() {
                gl::DrawElements(gl::TRIANGLES, self.count, gl::UNSIGNED_INT, std::ptr::null());
            } else {
                gl::DrawArrays(gl::TRIANGLES, 0, self.count);
            }
            gl::BindVertexArray(0);
        }
        if let Some(code) = ctx.error() {
            trace!("GL error 0x{:x} drawing vertex array {}", code, self.vao);
        }
    }
}

impl Drop for Mesh {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteVertexArrays(1, &self.vao);
            gl::DeleteBuffers(1, &self.vbo);
            if let Some(ebo) = self.ebo {
                gl::DeleteBuffers(1, &ebo);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_color_uv_layout() {
        let layout = VertexLayout::new().with(0, 3).with(1, 3).with(2, 2);
        assert_eq!(layout.floats_per_vertex(), 8);
        assert_eq!(layout.stride(), 32);
        assert_eq!(layout.offsets(), vec![0, 12, 24]);
    }

    #[test]
    fn test_position_only_layout() {
        let layout = VertexLayout::new().with(0, 3);
        assert_eq!(layout.stride(), 12);
        assert_eq!(layout.offsets(), vec![0]);
    }

    #[test]
    fn test_empty_layout() {
        let layout = VertexLayout::new();
        assert_eq!(layout.stride(), 0);
        assert!(layout.offsets().is_empty());
    }
}
