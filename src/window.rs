// window.rs - Window, GL context and render loop shared by every lesson

use anyhow::{anyhow, Context, Result};
use glutin::{
    config::{Config, ConfigTemplateBuilder},
    context::{ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version},
    display::{GetGlDisplay, GlDisplay},
    prelude::*,
    surface::{Surface, SwapInterval, WindowSurface},
};
use glutin_winit::{DisplayBuilder, GlWindow};
use log::{info, warn};
use raw_window_handle::HasRawWindowHandle;
use simple_logger::SimpleLogger;
use std::{ffi::CString, num::NonZeroU32, ptr, time::Instant};
use winit::{
    dpi::LogicalSize,
    event::{ElementState, Event, KeyEvent, WindowEvent},
    event_loop::{EventLoop, EventLoopWindowTarget},
    keyboard::{Key, NamedKey},
    window::{Window, WindowBuilder},
};

use crate::config::AppConfig;
use crate::render::GlContext;

/// Per-frame information handed to [`Lesson::render`].
#[derive(Debug, Clone, Copy)]
pub struct Frame {
    /// Seconds since the lesson was set up.
    pub elapsed: f32,
    pub width: u32,
    pub height: u32,
}

/// One tutorial step: builds its GPU objects once, then draws every frame.
pub trait Lesson: Sized {
    const NAME: &'static str;

    fn setup(ctx: &GlContext, config: &AppConfig) -> Result<Self>;

    fn render(&mut self, ctx: &GlContext, frame: &Frame);
}

/// Loads the user config, installs the logger and runs `L` until the
/// window is closed.
pub fn launch<L: Lesson + 'static>() -> Result<()> {
    let loaded = AppConfig::load_or_create();
    let level = loaded
        .as_ref()
        .map(AppConfig::log_level)
        .unwrap_or(log::LevelFilter::Info);
    SimpleLogger::new().with_level(level).init()?;

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            warn!("Using default settings: {}", e);
            AppConfig::default()
        }
    };
    run::<L>(config)
}

// Field order is drop order: the lesson's GPU objects go before the context.
struct App<L> {
    lesson: Option<L>,
    ctx: GlContext,
    gl_surface: Surface<WindowSurface>,
    gl_context: PossiblyCurrentContext,
    window: Window,
    started: Instant,
}

impl<L: Lesson> App<L> {
    fn new(config: &AppConfig, event_loop: &EventLoop<()>) -> Result<Self> {
        let (major, minor) = config.window.gl_version;
        let window_builder = WindowBuilder::new()
            .with_title(format!("{} - {}", config.window.title, L::NAME))
            .with_inner_size(LogicalSize::new(config.window.width, config.window.height));

        let template = ConfigTemplateBuilder::new().with_alpha_size(8);
        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));

        let (window, gl_config) = display_builder
            .build(event_loop, template, pick_config)
            .map_err(|e| anyhow!("Failed to create window: {}", e))?;
        let window = window.context("Display builder returned no window")?;

        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(major, minor))))
            .with_profile(GlProfile::Core)
            .build(Some(window.raw_window_handle()));

        let gl_display = gl_config.display();
        let not_current = unsafe { gl_display.create_context(&gl_config, &context_attributes) }
            .context("Failed to create OpenGL context")?;

        let attrs = window.build_surface_attributes(Default::default());
        let gl_surface = unsafe { gl_display.create_window_surface(&gl_config, &attrs) }
            .context("Failed to create GL surface")?;

        let gl_context = not_current
            .make_current(&gl_surface)
            .context("Failed to make context current")?;

        let interval = if config.window.vsync {
            SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        };
        if let Err(e) = gl_surface.set_swap_interval(&gl_context, interval) {
            warn!("Could not set swap interval: {}", e);
        }

        let ctx = unsafe {
            GlContext::load(|symbol| match CString::new(symbol) {
                Ok(symbol) => gl_display.get_proc_address(symbol.as_c_str()) as *const _,
                Err(_) => ptr::null(),
            })
        };

        let size = window.inner_size();
        ctx.viewport(0, 0, size.width as i32, size.height as i32);
        info!("OpenGL {}.{} core context ready ({}x{})", major, minor, size.width, size.height);

        let lesson = L::setup(&ctx, config).with_context(|| format!("Failed to set up {}", L::NAME))?;

        Ok(Self {
            lesson: Some(lesson),
            ctx,
            gl_surface,
            gl_context,
            window,
            started: Instant::now(),
        })
    }

    fn resize(&self, width: u32, height: u32) {
        if let (Some(w), Some(h)) = (NonZeroU32::new(width), NonZeroU32::new(height)) {
            self.gl_surface.resize(&self.gl_context, w, h);
            self.ctx.viewport(0, 0, width as i32, height as i32);
        }
    }

    fn redraw(&mut self) {
        let size = self.window.inner_size();
        let frame = Frame {
            elapsed: self.started.elapsed().as_secs_f32(),
            width: size.width,
            height: size.height,
        };
        if let Some(lesson) = &mut self.lesson {
            lesson.render(&self.ctx, &frame);
        }
        if let Err(e) = self.gl_surface.swap_buffers(&self.gl_context) {
            warn!("Failed to swap buffers: {}", e);
        }
    }

    /// GPU objects owned by the lesson are released while the context is
    /// still current.
    fn shutdown(&mut self, elwt: &EventLoopWindowTarget<()>) {
        self.lesson.take();
        elwt.exit();
    }
}

fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    configs
        .reduce(|accum, config| {
            if config.num_samples() > accum.num_samples() {
                config
            } else {
                accum
            }
        })
        .expect("display offered no GL configs")
}

fn is_escape(event: &KeyEvent) -> bool {
    event.state == ElementState::Pressed && event.logical_key == Key::Named(NamedKey::Escape)
}

pub fn run<L: Lesson + 'static>(config: AppConfig) -> Result<()> {
    info!("Starting {}", L::NAME);
    let event_loop = EventLoop::new()?;
    let mut app = App::<L>::new(&config, &event_loop)?;

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::CloseRequested => app.shutdown(elwt),
            WindowEvent::KeyboardInput { event, .. } if is_escape(&event) => app.shutdown(elwt),
            WindowEvent::Resized(size) => app.resize(size.width, size.height),
            WindowEvent::RedrawRequested => app.redraw(),
            _ => (),
        },
        Event::AboutToWait => app.window.request_redraw(),
        _ => (),
    })?;

    Ok(())
}
