use std::ffi::CStr;

/// Maximum number of bytes kept from a compile or link info log.
pub const MAX_INFO_LOG_LEN: usize = 1024;

/// Pipeline stage a source text is compiled against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn gl_enum(self) -> gl::types::GLenum {
        match self {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl std::fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

/// The slice of the graphics API a shader program needs.
///
/// Handles are the raw integer names the driver hands out. Implementations
/// are expected to be cheap to clone; a [`ShaderProgram`](super::ShaderProgram)
/// keeps its own copy so it can release the program on drop.
pub trait ShaderDriver: Clone {
    fn create_shader(&self, stage: ShaderStage) -> u32;
    fn compile_shader(&self, shader: u32, source: &CStr);
    fn compile_status(&self, shader: u32) -> bool;
    fn shader_info_log(&self, shader: u32) -> String;
    fn delete_shader(&self, shader: u32);

    fn create_program(&self) -> u32;
    fn attach_shader(&self, program: u32, shader: u32);
    fn link_program(&self, program: u32);
    fn link_status(&self, program: u32) -> bool;
    fn program_info_log(&self, program: u32) -> String;
    fn use_program(&self, program: u32);
    fn delete_program(&self, program: u32);

    /// `None` when the program has no active uniform with this name.
    fn uniform_location(&self, program: u32, name: &CStr) -> Option<i32>;
    fn uniform_1i(&self, location: i32, value: i32);
    fn uniform_1f(&self, location: i32, value: f32);
    fn uniform_4f(&self, location: i32, value: [f32; 4]);
    fn get_uniform_f32(&self, program: u32, location: i32) -> f32;
}

/// Trims a raw info log down to readable text, capped at [`MAX_INFO_LOG_LEN`].
pub fn clean_info_log(raw: &[u8]) -> String {
    let end = raw
        .iter()
        .position(|&b| b == 0)
        .unwrap_or(raw.len())
        .min(MAX_INFO_LOG_LEN);
    String::from_utf8_lossy(&raw[..end]).trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_log_stops_at_nul() {
        assert_eq!(clean_info_log(b"0:1: syntax error\n\0garbage"), "0:1: syntax error");
    }

    #[test]
    fn test_info_log_is_truncated() {
        let long = vec![b'x'; MAX_INFO_LOG_LEN * 2];
        assert_eq!(clean_info_log(&long).len(), MAX_INFO_LOG_LEN);
    }
}
