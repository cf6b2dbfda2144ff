use anyhow::Result;
use glam::Vec4;

use crate::config::AppConfig;
use crate::render::{ClearMask, GlContext};
use crate::window::{Frame, Lesson};

/// Clears the window to a flat color every frame.
pub struct HelloWindow {
    clear_color: Vec4,
}

impl Lesson for HelloWindow {
    const NAME: &'static str = "hello window";

    fn setup(_ctx: &GlContext, config: &AppConfig) -> Result<Self> {
        Ok(Self {
            clear_color: config.render.clear_color(),
        })
    }

    fn render(&mut self, ctx: &GlContext, _frame: &Frame) {
        ctx.clear_color(self.clear_color);
        ctx.clear(ClearMask::COLOR);
    }
}
