//! In-memory [`ShaderDriver`] used by the unit tests.
//!
//! It understands just enough GLSL to be useful: a stage fails to compile
//! when `main` is missing, brackets are unbalanced or an assignment is not
//! terminated, and a program fails to link when the fragment stage reads an
//! `in` the vertex stage never writes. Declared uniforms become active
//! slots.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::ffi::CStr;
use std::rc::Rc;

use super::driver::{ShaderDriver, ShaderStage};

struct FakeShader {
    stage: ShaderStage,
    source: String,
    compiled: bool,
    log: String,
}

#[derive(Default)]
struct FakeProgram {
    attached: Vec<u32>,
    linked: bool,
    log: String,
    uniforms: Vec<(String, [f32; 4])>,
}

#[derive(Default)]
struct State {
    next_id: u32,
    shaders: HashMap<u32, FakeShader>,
    programs: HashMap<u32, FakeProgram>,
    current: Option<u32>,
    compiled: usize,
    uniform_writes: usize,
    silent_logs: bool,
}

impl State {
    fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn write(&mut self, location: i32, value: [f32; 4]) {
        let Some(current) = self.current else { return };
        if let Some(slot) = self
            .programs
            .get_mut(&current)
            .and_then(|p| p.uniforms.get_mut(location as usize))
        {
            slot.1 = value;
            self.uniform_writes += 1;
        }
    }
}

#[derive(Clone, Default)]
pub struct FakeDriver {
    state: Rc<RefCell<State>>,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every info log come back empty.
    pub fn with_silent_logs(self) -> Self {
        self.state.borrow_mut().silent_logs = true;
        self
    }

    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub fn compiled_count(&self) -> usize {
        self.state.borrow().compiled
    }

    pub fn uniform_writes(&self) -> usize {
        self.state.borrow().uniform_writes
    }

    pub fn current_program(&self) -> Option<u32> {
        self.state.borrow().current
    }

    pub fn is_linked(&self, program: u32) -> bool {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map_or(false, |p| p.linked)
    }

    pub fn uniform(&self, program: u32, name: &str) -> Option<[f32; 4]> {
        let state = self.state.borrow();
        let program = state.programs.get(&program)?;
        program
            .uniforms
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }
}

fn check_syntax(source: &str) -> Result<(), String> {
    if !source.contains("void main") {
        return Err("0:1: error: missing entry point 'main'".into());
    }

    let mut depth = 0i32;
    for (number, line) in source.lines().enumerate() {
        for c in line.chars() {
            match c {
                '(' | '{' => depth += 1,
                ')' | '}' => depth -= 1,
                _ => {}
            }
            if depth < 0 {
                return Err(format!("0:{}: error: unexpected '{}'", number + 1, c));
            }
        }

        let trimmed = line.trim();
        if trimmed.contains(" = ") && !trimmed.ends_with(';') {
            return Err(format!("0:{}: error: syntax error, expected ';'", number + 1));
        }
    }

    if depth != 0 {
        return Err("0:0: error: unexpected end of file".into());
    }
    Ok(())
}

fn compiled_source<'a>(stages: &[&'a FakeShader], stage: ShaderStage) -> Option<&'a str> {
    stages
        .iter()
        .copied()
        .find(|s| s.stage == stage && s.compiled)
        .map(|s| s.source.as_str())
}

/// Names declared with `qualifier <type> <name>;`, ignoring `layout(...)` lines.
fn declared<'a>(source: &'a str, qualifier: &str) -> Vec<&'a str> {
    source
        .lines()
        .map(|line| line.trim().trim_start_matches("flat "))
        .filter_map(|line| {
            let mut words = line.split_whitespace();
            if words.next()? != qualifier {
                return None;
            }
            let _ty = words.next()?;
            words.next().map(|name| name.trim_end_matches(';'))
        })
        .collect()
}

impl ShaderDriver for FakeDriver {
    fn create_shader(&self, stage: ShaderStage) -> u32 {
        let mut state = self.state.borrow_mut();
        let id = state.next_id();
        state.shaders.insert(
            id,
            FakeShader {
                stage,
                source: String::new(),
                compiled: false,
                log: String::new(),
            },
        );
        id
    }

    fn compile_shader(&self, shader: u32, source: &CStr) {
        let mut state = self.state.borrow_mut();
        state.compiled += 1;
        if let Some(s) = state.shaders.get_mut(&shader) {
            s.source = source.to_string_lossy().into_owned();
            match check_syntax(&s.source) {
                Ok(()) => s.compiled = true,
                Err(log) => s.log = log,
            }
        }
    }

    fn compile_status(&self, shader: u32) -> bool {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .map_or(false, |s| s.compiled)
    }

    fn shader_info_log(&self, shader: u32) -> String {
        let state = self.state.borrow();
        if state.silent_logs {
            return String::new();
        }
        state
            .shaders
            .get(&shader)
            .map(|s| s.log.clone())
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: u32) {
        self.state.borrow_mut().shaders.remove(&shader);
    }

    fn create_program(&self) -> u32 {
        let mut state = self.state.borrow_mut();
        let id = state.next_id();
        state.programs.insert(id, FakeProgram::default());
        id
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        if let Some(p) = self.state.borrow_mut().programs.get_mut(&program) {
            p.attached.push(shader);
        }
    }

    fn link_program(&self, program: u32) {
        let mut state = self.state.borrow_mut();
        let state = &mut *state;
        let Some(p) = state.programs.get_mut(&program) else { return };

        let stages: Vec<&FakeShader> = p
            .attached
            .iter()
            .filter_map(|id| state.shaders.get(id))
            .collect();
        let (Some(vertex), Some(fragment)) = (
            compiled_source(&stages, ShaderStage::Vertex),
            compiled_source(&stages, ShaderStage::Fragment),
        ) else {
            p.log = "error: program needs a compiled vertex and fragment stage".into();
            return;
        };

        let outputs: HashSet<&str> = declared(vertex, "out").into_iter().collect();
        if let Some(missing) = declared(fragment, "in")
            .into_iter()
            .find(|name| !outputs.contains(name))
        {
            p.log = format!(
                "error: fragment shader input '{}' is not written by the vertex shader",
                missing
            );
            return;
        }

        let mut uniforms: Vec<(String, [f32; 4])> = Vec::new();
        for name in declared(vertex, "uniform")
            .into_iter()
            .chain(declared(fragment, "uniform"))
        {
            if !uniforms.iter().any(|(n, _)| n == name) {
                uniforms.push((name.to_string(), [0.0; 4]));
            }
        }
        p.uniforms = uniforms;
        p.linked = true;
    }

    fn link_status(&self, program: u32) -> bool {
        self.is_linked(program)
    }

    fn program_info_log(&self, program: u32) -> String {
        let state = self.state.borrow();
        if state.silent_logs {
            return String::new();
        }
        state
            .programs
            .get(&program)
            .map(|p| p.log.clone())
            .unwrap_or_default()
    }

    fn use_program(&self, program: u32) {
        self.state.borrow_mut().current = Some(program);
    }

    fn delete_program(&self, program: u32) {
        let mut state = self.state.borrow_mut();
        state.programs.remove(&program);
        if state.current == Some(program) {
            state.current = None;
        }
    }

    fn uniform_location(&self, program: u32, name: &CStr) -> Option<i32> {
        let state = self.state.borrow();
        let name = name.to_str().ok()?;
        state
            .programs
            .get(&program)?
            .uniforms
            .iter()
            .position(|(n, _)| n == name)
            .map(|index| index as i32)
    }

    fn uniform_1i(&self, location: i32, value: i32) {
        self.state
            .borrow_mut()
            .write(location, [value as f32, 0.0, 0.0, 0.0]);
    }

    fn uniform_1f(&self, location: i32, value: f32) {
        self.state.borrow_mut().write(location, [value, 0.0, 0.0, 0.0]);
    }

    fn uniform_4f(&self, location: i32, value: [f32; 4]) {
        self.state.borrow_mut().write(location, value);
    }

    fn get_uniform_f32(&self, program: u32, location: i32) -> f32 {
        self.state
            .borrow()
            .programs
            .get(&program)
            .and_then(|p| p.uniforms.get(location as usize))
            .map_or(0.0, |(_, v)| v[0])
    }
}
