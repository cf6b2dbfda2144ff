pub mod hello_triangle;
pub mod hello_window;
pub mod shaders;
pub mod textures;

pub use hello_triangle::HelloTriangle;
pub use hello_window::HelloWindow;
pub use shaders::UniformColor;
pub use textures::TexturedQuad;

/// Oscillates between 0 and 1 with a period of 2π seconds.
pub fn pulse(seconds: f32) -> f32 {
    seconds.sin() / 2.0 + 0.5
}
