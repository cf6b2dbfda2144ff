use bitflags::bitflags;
use gl::types::*;
use glam::Vec4;
use std::ffi::{c_void, CStr};
use std::marker::PhantomData;
use std::ptr;

use super::driver::{clean_info_log, ShaderDriver, ShaderStage, MAX_INFO_LOG_LEN};
use super::texture::Texture;

bitflags! {
    /// Buffers cleared by [`GlContext::clear`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ClearMask: u32 {
        const COLOR = gl::COLOR_BUFFER_BIT;
        const DEPTH = gl::DEPTH_BUFFER_BIT;
        const STENCIL = gl::STENCIL_BUFFER_BIT;
    }
}

/// Proof that the OpenGL function pointers are loaded for the context that
/// is current on this thread.
///
/// Every GPU object in this crate goes through a `GlContext` instead of
/// touching driver state on its own. The type is `Copy` but not `Send`, so
/// nothing holding one can leave the context thread.
#[derive(Debug, Clone, Copy)]
pub struct GlContext {
    _not_send: PhantomData<*const ()>,
}

impl GlContext {
    /// Resolves all GL entry points through `loader`.
    ///
    /// # Safety
    /// A context must be current on the calling thread and `loader` must
    /// return valid function pointers for it.
    pub unsafe fn load<F>(loader: F) -> Self
    where
        F: FnMut(&'static str) -> *const c_void,
    {
        gl::load_with(loader);
        Self {
            _not_send: PhantomData,
        }
    }

    pub fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { gl::Viewport(x, y, width, height) };
    }

    pub fn clear_color(&self, color: Vec4) {
        unsafe { gl::ClearColor(color.x, color.y, color.z, color.w) };
    }

    pub fn clear(&self, mask: ClearMask) {
        unsafe { gl::Clear(mask.bits()) };
    }

    /// Binds `texture` to texture unit `unit` (0 for `GL_TEXTURE0`, ...).
    pub fn bind_texture(&self, unit: u32, texture: &Texture) {
        unsafe {
            gl::ActiveTexture(gl::TEXTURE0 + unit);
            gl::BindTexture(gl::TEXTURE_2D, texture.id());
        }
    }

    pub fn get_integer(&self, pname: GLenum) -> i32 {
        let mut value = 0;
        unsafe { gl::GetIntegerv(pname, &mut value) };
        value
    }

    pub fn max_vertex_attribs(&self) -> i32 {
        self.get_integer(gl::MAX_VERTEX_ATTRIBS)
    }

    /// Pops the oldest pending error flag, if any.
    pub fn error(&self) -> Option<GLenum> {
        match unsafe { gl::GetError() } {
            gl::NO_ERROR => None,
            code => Some(code),
        }
    }
}

impl ShaderDriver for GlContext {
    fn create_shader(&self, stage: ShaderStage) -> u32 {
        unsafe { gl::CreateShader(stage.gl_enum()) }
    }

    fn compile_shader(&self, shader: u32, source: &CStr) {
        unsafe {
            gl::ShaderSource(shader, 1, &source.as_ptr(), ptr::null());
            gl::CompileShader(shader);
        }
    }

    fn compile_status(&self, shader: u32) -> bool {
        let mut success = 0;
        unsafe { gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut success) };
        success != 0
    }

    fn shader_info_log(&self, shader: u32) -> String {
        let mut len = 0;
        unsafe { gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len) };
        let mut buffer = vec![0u8; (len.max(0) as usize).min(MAX_INFO_LOG_LEN + 1)];
        if !buffer.is_empty() {
            unsafe {
                gl::GetShaderInfoLog(
                    shader,
                    buffer.len() as GLsizei,
                    ptr::null_mut(),
                    buffer.as_mut_ptr() as *mut GLchar,
                );
            }
        }
        clean_info_log(&buffer)
    }

    fn delete_shader(&self, shader: u32) {
        unsafe { gl::DeleteShader(shader) };
    }

    fn create_program(&self) -> u32 {
        unsafe { gl::CreateProgram() }
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        unsafe { gl::AttachShader(program, shader) };
    }

    fn link_program(&self, program: u32) {
        unsafe { gl::LinkProgram(program) };
    }

    fn link_status(&self, program: u32) -> bool {
        let mut success = 0;
        unsafe { gl::GetProgramiv(program, gl::LINK_STATUS, &mut success) };
        success != 0
    }

    fn program_info_log(&self, program: u32) -> String {
        let mut len = 0;
        unsafe { gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len) };
        let mut buffer = vec![0u8; (len.max(0) as usize).min(MAX_INFO_LOG_LEN + 1)];
        if !buffer.is_empty() {
            unsafe {
                gl::GetProgramInfoLog(
                    program,
                    buffer.len() as GLsizei,
                    ptr::null_mut(),
                    buffer.as_mut_ptr() as *mut GLchar,
                );
            }
        }
        clean_info_log(&buffer)
    }

    fn use_program(&self, program: u32) {
        unsafe { gl::UseProgram(program) };
    }

    fn delete_program(&self, program: u32) {
        unsafe { gl::DeleteProgram(program) };
    }

    fn uniform_location(&self, program: u32, name: &CStr) -> Option<i32> {
        let location = unsafe { gl::GetUniformLocation(program, name.as_ptr()) };
        (location >= 0).then_some(location)
    }

    fn uniform_1i(&self, location: i32, value: i32) {
        unsafe { gl::Uniform1i(location, value) };
    }

    fn uniform_1f(&self, location: i32, value: f32) {
        unsafe { gl::Uniform1f(location, value) };
    }

    fn uniform_4f(&self, location: i32, value: [f32; 4]) {
        unsafe { gl::Uniform4f(location, value[0], value[1], value[2], value[3]) };
    }

    fn get_uniform_f32(&self, program: u32, location: i32) -> f32 {
        let mut value = 0.0;
        unsafe { gl::GetUniformfv(program, location, &mut value) };
        value
    }
}
