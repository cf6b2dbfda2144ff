use anyhow::{Context, Result};
use glam::Vec4;
use log::info;

use crate::config::AppConfig;
use crate::render::{ClearMask, GlContext, Mesh, ShaderProgram, VertexLayout};
use crate::window::{Frame, Lesson};

pub const VERTEX_SRC: &str = r#"
#version 330 core
layout (location = 0) in vec3 aPos;
void main() {
    gl_Position = vec4(aPos.x, aPos.y, aPos.z, 1.0);
}
"#;

pub const FRAGMENT_SRC: &str = r#"
#version 330 core
out vec4 FragColor;
void main() {
    FragColor = vec4(1.0, 0.5, 0.2, 1.0);
}
"#;

#[rustfmt::skip]
const VERTICES: [f32; 12] = [
     0.5,  0.5, 0.0, // top right
     0.5, -0.5, 0.0, // bottom right
    -0.5, -0.5, 0.0, // bottom left
    -0.5,  0.5, 0.0, // top left
];

#[rustfmt::skip]
const INDICES: [u32; 6] = [
    0, 1, 3,
    1, 2, 3,
];

/// Orange rectangle built from two indexed triangles, shaders inline.
pub struct HelloTriangle {
    clear_color: Vec4,
    program: ShaderProgram,
    quad: Mesh,
}

impl Lesson for HelloTriangle {
    const NAME: &'static str = "hello triangle";

    fn setup(ctx: &GlContext, config: &AppConfig) -> Result<Self> {
        let program = ShaderProgram::from_sources(*ctx, VERTEX_SRC, FRAGMENT_SRC)
            .context("Failed to build the inline shader program")?;
        let layout = VertexLayout::new().with(0, 3);
        let quad = Mesh::new(ctx, &VERTICES, Some(&INDICES[..]), &layout);
        info!("Quad uploaded: {} vertices, {} indices", VERTICES.len() / 3, INDICES.len());

        Ok(Self {
            clear_color: config.render.clear_color(),
            program,
            quad,
        })
    }

    fn render(&mut self, ctx: &GlContext, _frame: &Frame) {
        ctx.clear_color(self.clear_color);
        ctx.clear(ClearMask::COLOR);
        self.quad.draw(ctx, &self.program);
    }
}
