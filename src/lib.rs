pub mod config;
pub mod lessons;
pub mod render;
pub mod window;

// Re-export commonly used types
pub use config::AppConfig;
pub use render::{GlContext, ShaderError, ShaderProgram};
pub use window::{Frame, Lesson};
