use anyhow::{Context, Result};
use glam::Vec4;
use log::{error, info};
use std::path::Path;

use super::pulse;
use crate::config::AppConfig;
use crate::render::{
    ClearMask, GlContext, ImageData, Mesh, ShaderProgram, Texture, TextureOptions, VertexLayout,
};
use crate::window::{Frame, Lesson};

#[rustfmt::skip]
const VERTICES: [f32; 32] = [
    // positions      // colors       // texture coords
     0.5,  0.5, 0.0,  1.0, 0.0, 0.0,  1.0, 1.0, // top right
     0.5, -0.5, 0.0,  0.0, 1.0, 0.0,  1.0, 0.0, // bottom right
    -0.5, -0.5, 0.0,  0.0, 0.0, 1.0,  0.0, 0.0, // bottom left
    -0.5,  0.5, 0.0,  1.0, 1.0, 0.0,  0.0, 1.0, // top left
];

#[rustfmt::skip]
const INDICES: [u32; 6] = [
    0, 1, 3,
    1, 2, 3,
];

/// Quad sampling two textures, blended by `lerpVal`.
pub struct TexturedQuad {
    clear_color: Vec4,
    program: ShaderProgram,
    quad: Mesh,
    first: Texture,
    second: Texture,
}

/// Falls back to a checkerboard so the lesson still runs without its images.
fn load_or_checkerboard(ctx: &GlContext, path: &Path, options: &TextureOptions) -> Result<Texture> {
    match Texture::from_file(ctx, path, options) {
        Ok(texture) => Ok(texture),
        Err(e) => {
            error!("Failed to load texture: {}", e);
            let fallback = ImageData::checkerboard(64, 8, [255, 0, 255], [32, 32, 32]);
            Ok(Texture::upload(ctx, &fallback, options)?)
        }
    }
}

impl Lesson for TexturedQuad {
    const NAME: &'static str = "textures";

    fn setup(ctx: &GlContext, config: &AppConfig) -> Result<Self> {
        info!("Max vertex attributes: {}", ctx.max_vertex_attribs());

        let layout = VertexLayout::new().with(0, 3).with(1, 3).with(2, 2);
        let quad = Mesh::new(ctx, &VERTICES, Some(&INDICES[..]), &layout);

        let options = TextureOptions {
            flip_vertically: config.render.flip_textures,
            ..TextureOptions::default()
        };
        let first = load_or_checkerboard(ctx, &config.texture_path("pic1.png"), &options)?;
        let second = load_or_checkerboard(ctx, &config.texture_path("pic2.png"), &options)?;

        let vertex = config.shader_path("textured.vert");
        let fragment = config.shader_path("textured.frag");
        let program = ShaderProgram::from_files(*ctx, &vertex, &fragment)
            .with_context(|| format!("Failed to build shader from {:?}", vertex))?;

        // Sampler units only need setting once.
        program.set_int("texture1", 0);
        program.set_int("texture2", 1);

        Ok(Self {
            clear_color: config.render.clear_color(),
            program,
            quad,
            first,
            second,
        })
    }

    fn render(&mut self, ctx: &GlContext, frame: &Frame) {
        ctx.clear_color(self.clear_color);
        ctx.clear(ClearMask::COLOR);

        ctx.bind_texture(0, &self.first);
        ctx.bind_texture(1, &self.second);

        self.program.set_float("lerpVal", pulse(frame.elapsed));
        self.quad.draw(ctx, &self.program);
    }
}
