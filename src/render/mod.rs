pub mod context;
pub mod driver;
pub mod mesh;
pub mod shaders;
pub mod texture;

#[cfg(test)]
mod fake;

pub use context::{ClearMask, GlContext};
pub use driver::{ShaderDriver, ShaderStage};
pub use mesh::{Mesh, VertexLayout};
pub use shaders::{ShaderError, ShaderProgram, UniformValue};
pub use texture::{ImageData, Texture, TextureError, TextureOptions};
