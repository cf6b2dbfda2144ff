// shaders.rs - Shader program loading, linking and uniform access

use glam::Vec4;
use log::{debug, error, info, trace};
use std::ffi::{CString, NulError};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::context::GlContext;
use super::driver::{ShaderDriver, ShaderStage};

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("Failed to read shader source {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Null byte error: {0}")]
    Nul(#[from] NulError),
    #[error("{stage} shader compilation failed: {log}")]
    Compilation { stage: ShaderStage, log: String },
    #[error("Program linking failed: {0}")]
    Linking(String),
}

impl ShaderError {
    /// Driver diagnostic attached to a compile or link failure.
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            ShaderError::Compilation { log, .. } | ShaderError::Linking(log) => Some(log),
            _ => None,
        }
    }
}

const EMPTY_LOG: &str = "driver reported no diagnostic";

/// Values that can be written to a uniform slot.
pub trait UniformValue {
    fn write<D: ShaderDriver>(&self, driver: &D, location: i32);
}

impl UniformValue for bool {
    fn write<D: ShaderDriver>(&self, driver: &D, location: i32) {
        driver.uniform_1i(location, *self as i32);
    }
}

impl UniformValue for i32 {
    fn write<D: ShaderDriver>(&self, driver: &D, location: i32) {
        driver.uniform_1i(location, *self);
    }
}

impl UniformValue for f32 {
    fn write<D: ShaderDriver>(&self, driver: &D, location: i32) {
        driver.uniform_1f(location, *self);
    }
}

impl UniformValue for Vec4 {
    fn write<D: ShaderDriver>(&self, driver: &D, location: i32) {
        driver.uniform_4f(location, self.to_array());
    }
}

impl UniformValue for [f32; 4] {
    fn write<D: ShaderDriver>(&self, driver: &D, location: i32) {
        driver.uniform_4f(location, *self);
    }
}

/// Compiled stage that is deleted when it goes out of scope, so both
/// stages are released on every construction path.
struct StageGuard<'a, D: ShaderDriver> {
    driver: &'a D,
    id: u32,
}

impl<D: ShaderDriver> Drop for StageGuard<'_, D> {
    fn drop(&mut self) {
        self.driver.delete_shader(self.id);
    }
}

/// A linked vertex + fragment pipeline.
///
/// Owns its program handle and deletes it on drop. Construction either
/// returns a fully linked program or an error; there is no half-built state.
pub struct ShaderProgram<D: ShaderDriver = GlContext> {
    driver: D,
    id: u32,
}

impl<D: ShaderDriver> ShaderProgram<D> {
    /// Reads both source files and builds a program from them.
    pub fn from_files<P: AsRef<Path>>(
        driver: D,
        vertex_path: P,
        fragment_path: P,
    ) -> Result<Self, ShaderError> {
        let vertex_source = Self::read_source(vertex_path.as_ref())?;
        let fragment_source = Self::read_source(fragment_path.as_ref())?;
        Self::from_sources(driver, &vertex_source, &fragment_source)
    }

    pub fn from_sources(
        driver: D,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<Self, ShaderError> {
        let vertex_c = CString::new(vertex_source)?;
        let fragment_c = CString::new(fragment_source)?;

        // Both stages are compiled before giving up so every diagnostic
        // ends up in the log.
        let vertex = Self::compile_stage(&driver, ShaderStage::Vertex, &vertex_c);
        let fragment = Self::compile_stage(&driver, ShaderStage::Fragment, &fragment_c);
        let (vertex, fragment) = (vertex?, fragment?);

        let program = ShaderProgram {
            id: driver.create_program(),
            driver: driver.clone(),
        };
        program.driver.attach_shader(program.id, vertex.id);
        program.driver.attach_shader(program.id, fragment.id);
        program.driver.link_program(program.id);
        drop(vertex);
        drop(fragment);

        if !program.driver.link_status(program.id) {
            let log = non_empty(program.driver.program_info_log(program.id));
            error!("Shader program linking failed:\n{}", log);
            return Err(ShaderError::Linking(log));
        }

        info!("Shader program {} linked", program.id);
        Ok(program)
    }

    fn read_source(path: &Path) -> Result<String, ShaderError> {
        fs::read_to_string(path).map_err(|source| {
            error!("Failed to read shader source {:?}: {}", path, source);
            ShaderError::Io {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    fn compile_stage<'a>(
        driver: &'a D,
        stage: ShaderStage,
        source: &CString,
    ) -> Result<StageGuard<'a, D>, ShaderError> {
        let shader = StageGuard {
            driver,
            id: driver.create_shader(stage),
        };
        driver.compile_shader(shader.id, source);

        if !driver.compile_status(shader.id) {
            let log = non_empty(driver.shader_info_log(shader.id));
            error!("{} shader compilation failed:\n{}", stage, log);
            return Err(ShaderError::Compilation { stage, log });
        }

        debug!("{} shader compiled", stage);
        Ok(shader)
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Makes this program current for subsequent draw calls.
    pub fn set_used(&self) {
        self.driver.use_program(self.id);
    }

    fn location(&self, name: &str) -> Option<i32> {
        let cname = match CString::new(name) {
            Ok(cname) => cname,
            Err(_) => {
                trace!("Uniform name {:?} contains a null byte", name);
                return None;
            }
        };
        let location = self.driver.uniform_location(self.id, &cname);
        if location.is_none() {
            trace!("Uniform '{}' not active in program {}", name, self.id);
        }
        location
    }

    /// Writes `value` to the uniform called `name`.
    ///
    /// Names the program does not expose are ignored.
    pub fn set_uniform<T: UniformValue>(&self, name: &str, value: T) {
        self.set_used();
        if let Some(location) = self.location(name) {
            value.write(&self.driver, location);
        }
    }

    pub fn set_bool(&self, name: &str, value: bool) {
        self.set_uniform(name, value);
    }

    pub fn set_int(&self, name: &str, value: i32) {
        self.set_uniform(name, value);
    }

    pub fn set_float(&self, name: &str, value: f32) {
        self.set_uniform(name, value);
    }

    pub fn set_vec4(&self, name: &str, x: f32, y: f32, z: f32, w: f32) {
        self.set_uniform(name, Vec4::new(x, y, z, w));
    }

    /// Reads a float uniform back from the driver.
    pub fn uniform_f32(&self, name: &str) -> Option<f32> {
        self.location(name)
            .map(|location| self.driver.get_uniform_f32(self.id, location))
    }
}

impl<D: ShaderDriver> Drop for ShaderProgram<D> {
    fn drop(&mut self) {
        self.driver.delete_program(self.id);
    }
}

fn non_empty(log: String) -> String {
    if log.trim().is_empty() {
        EMPTY_LOG.to_string()
    } else {
        log
    }
}
