use anyhow::{Context, Result};
use glam::Vec4;

use super::pulse;
use crate::config::AppConfig;
use crate::render::{ClearMask, GlContext, Mesh, ShaderProgram, VertexLayout};
use crate::window::{Frame, Lesson};

#[rustfmt::skip]
const VERTICES: [f32; 9] = [
    -0.5, -0.5, 0.0,
     0.5, -0.5, 0.0,
     0.0,  0.5, 0.0,
];

/// Triangle whose green channel pulses with time through the `ourColor`
/// uniform. Shaders are read from the asset directory.
pub struct UniformColor {
    clear_color: Vec4,
    program: ShaderProgram,
    triangle: Mesh,
}

impl Lesson for UniformColor {
    const NAME: &'static str = "shaders";

    fn setup(ctx: &GlContext, config: &AppConfig) -> Result<Self> {
        let vertex = config.shader_path("uniform_color.vert");
        let fragment = config.shader_path("uniform_color.frag");
        let program = ShaderProgram::from_files(*ctx, &vertex, &fragment)
            .with_context(|| format!("Failed to build shader from {:?}", vertex))?;
        let triangle = Mesh::new(ctx, &VERTICES, None, &VertexLayout::new().with(0, 3));

        Ok(Self {
            clear_color: config.render.clear_color(),
            program,
            triangle,
        })
    }

    fn render(&mut self, ctx: &GlContext, frame: &Frame) {
        ctx.clear_color(self.clear_color);
        ctx.clear(ClearMask::COLOR);

        let green = pulse(frame.elapsed);
        self.program.set_vec4("ourColor", 0.0, green, 0.0, 1.0);
        self.triangle.draw(ctx, &self.program);
    }
}
