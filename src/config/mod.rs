pub mod core;
pub mod rendering;
pub mod window;

pub use self::core::{AppConfig, ConfigError};
pub use rendering::RenderConfig;
pub use window::WindowConfig;
