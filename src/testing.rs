//! An in-memory [`GraphicsContext`] for unit tests.
//!
//! [`RecordingContext`] keeps a log of every call and enough object state to
//! answer the questions the tests ask: which objects are alive, what is
//! attached to a program, which program is current, which texture is bound
//! to which unit, and which error flags are pending. Invalid handles raise
//! the same error flags a desktop driver would.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};

use crate::context::GraphicsContext;

/// A GL call as seen by the recording context.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Call {
    CreateShader(u32),
    ShaderSource(u32),
    CompileShader(u32),
    DeleteShader(u32),
    CreateProgram,
    AttachShader(u32, u32),
    DetachShader(u32, u32),
    LinkProgram(u32),
    UseProgram(Option<u32>),
    DeleteProgram(u32),
    CreateTexture,
    ActiveTexture(u32),
    BindTexture(u32, Option<u32>),
    TexParameter(u32, u32, i32),
    TexImage2d { width: i32, height: i32, len: usize },
    DeleteTexture(u32),
    DeleteBuffer(u32),
}

#[derive(Default)]
struct State {
    next_name: u32,
    calls: Vec<Call>,
    shaders: HashMap<u32, Shader>,
    programs: HashMap<u32, Vec<u32>>,
    linked: HashSet<u32>,
    textures: HashMap<u32, Texture>,
    buffers: HashSet<u32>,
    current_program: Option<u32>,
    active_unit: u32,
    bindings: HashMap<u32, u32>,
    errors: VecDeque<u32>,
    fail_allocations: bool,
}

#[derive(Default)]
struct Shader {
    source: String,
    compiled: bool,
}

#[derive(Default)]
struct Texture {
    parameters: HashMap<u32, i32>,
    size: Option<(i32, i32)>,
}

impl State {
    fn allocate(&mut self) -> u32 {
        self.next_name += 1;
        self.next_name
    }

    fn raise(&mut self, code: u32) {
        self.errors.push_back(code);
    }

    fn bound_texture(&self) -> Option<u32> {
        self.bindings.get(&self.active_unit).copied()
    }
}

/// Records GL calls and simulates object lifetimes.
pub(crate) struct RecordingContext {
    state: RefCell<State>,
}

impl RecordingContext {
    pub(crate) fn new() -> Self {
        Self {
            state: RefCell::new(State {
                active_unit: glow::TEXTURE0,
                ..State::default()
            }),
        }
    }

    /// Every call issued so far, in order.
    pub(crate) fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    /// Forget the calls recorded so far, keeping object state.
    pub(crate) fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    /// Create a live buffer object, as a caller's vertex upload would.
    pub(crate) fn buffer(&self) -> u32 {
        let mut state = self.state.borrow_mut();
        let name = state.allocate();
        state.buffers.insert(name);
        name
    }

    /// Queue an error flag for the next `getError`.
    pub(crate) fn raise(&self, code: u32) {
        self.state.borrow_mut().raise(code);
    }

    /// Make every subsequent `create*` call fail, as after a context loss.
    pub(crate) fn fail_allocations(&self) {
        self.state.borrow_mut().fail_allocations = true;
    }

    pub(crate) fn current_program(&self) -> Option<u32> {
        self.state.borrow().current_program
    }

    pub(crate) fn active_unit(&self) -> u32 {
        self.state.borrow().active_unit
    }

    pub(crate) fn bound_texture(&self, unit: u32) -> Option<u32> {
        self.state.borrow().bindings.get(&unit).copied()
    }

    pub(crate) fn attached(&self, program: u32) -> Vec<u32> {
        self.state
            .borrow()
            .programs
            .get(&program)
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) fn shader_source_of(&self, shader: u32) -> Option<String> {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .map(|shader| shader.source.clone())
    }

    pub(crate) fn texture_parameter(&self, texture: u32, parameter: u32) -> Option<i32> {
        self.state
            .borrow()
            .textures
            .get(&texture)
            .and_then(|texture| texture.parameters.get(&parameter).copied())
    }

    pub(crate) fn texture_size(&self, texture: u32) -> Option<(i32, i32)> {
        self.state
            .borrow()
            .textures
            .get(&texture)
            .and_then(|texture| texture.size)
    }

    /// Whether any object with this name is still alive.
    pub(crate) fn is_live(&self, name: u32) -> bool {
        let state = self.state.borrow();
        state.shaders.contains_key(&name)
            || state.programs.contains_key(&name)
            || state.textures.contains_key(&name)
            || state.buffers.contains(&name)
    }

    fn record(&self, call: Call) -> std::cell::RefMut<'_, State> {
        let mut state = self.state.borrow_mut();
        state.calls.push(call);
        state
    }
}

impl GraphicsContext for RecordingContext {
    type Shader = u32;
    type Program = u32;
    type Texture = u32;
    type Buffer = u32;

    unsafe fn create_shader(&self, shader_type: u32) -> Result<u32, String> {
        let mut state = self.record(Call::CreateShader(shader_type));
        if state.fail_allocations {
            return Err("context lost".to_owned());
        }
        let name = state.allocate();
        state.shaders.insert(name, Shader::default());
        Ok(name)
    }

    unsafe fn shader_source(&self, shader: u32, source: &str) {
        let mut state = self.record(Call::ShaderSource(shader));
        match state.shaders.get_mut(&shader) {
            Some(entry) => entry.source = source.to_owned(),
            None => state.raise(glow::INVALID_VALUE),
        }
    }

    unsafe fn compile_shader(&self, shader: u32) {
        let mut state = self.record(Call::CompileShader(shader));
        match state.shaders.get_mut(&shader) {
            Some(entry) => entry.compiled = entry.source.contains("void main()"),
            None => state.raise(glow::INVALID_VALUE),
        }
    }

    unsafe fn shader_compile_status(&self, shader: u32) -> bool {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .is_some_and(|entry| entry.compiled)
    }

    unsafe fn shader_info_log(&self, shader: u32) -> String {
        match self.state.borrow().shaders.get(&shader) {
            Some(entry) if !entry.compiled => "ERROR: 0:1: 'main' : missing".to_owned(),
            _ => String::new(),
        }
    }

    unsafe fn delete_shader(&self, shader: u32) {
        let mut state = self.record(Call::DeleteShader(shader));
        if state.shaders.remove(&shader).is_none() {
            state.raise(glow::INVALID_VALUE);
        }
    }

    unsafe fn create_program(&self) -> Result<u32, String> {
        let mut state = self.record(Call::CreateProgram);
        if state.fail_allocations {
            return Err("context lost".to_owned());
        }
        let name = state.allocate();
        state.programs.insert(name, Vec::new());
        Ok(name)
    }

    unsafe fn attach_shader(&self, program: u32, shader: u32) {
        let mut state = self.record(Call::AttachShader(program, shader));
        if !state.shaders.contains_key(&shader) {
            state.raise(glow::INVALID_VALUE);
            return;
        }
        match state.programs.get_mut(&program) {
            Some(attached) => attached.push(shader),
            None => state.raise(glow::INVALID_VALUE),
        }
    }

    unsafe fn detach_shader(&self, program: u32, shader: u32) {
        let mut state = self.record(Call::DetachShader(program, shader));
        if !state.shaders.contains_key(&shader) {
            state.raise(glow::INVALID_VALUE);
            return;
        }
        let detached = state.programs.get_mut(&program).map(|attached| {
            let before = attached.len();
            attached.retain(|name| *name != shader);
            before != attached.len()
        });
        match detached {
            Some(true) => {}
            Some(false) => state.raise(glow::INVALID_OPERATION),
            None => state.raise(glow::INVALID_VALUE),
        }
    }

    unsafe fn link_program(&self, program: u32) {
        let mut state = self.record(Call::LinkProgram(program));
        let Some(attached) = state.programs.get(&program) else {
            state.raise(glow::INVALID_VALUE);
            return;
        };
        let linked = attached.len() == 2
            && attached
                .iter()
                .all(|shader| state.shaders.get(shader).is_some_and(|entry| entry.compiled));
        if linked {
            state.linked.insert(program);
        } else {
            state.linked.remove(&program);
        }
    }

    unsafe fn program_link_status(&self, program: u32) -> bool {
        self.state.borrow().linked.contains(&program)
    }

    unsafe fn program_info_log(&self, program: u32) -> String {
        if self.state.borrow().linked.contains(&program) {
            String::new()
        } else {
            "link failed: attached shaders did not compile".to_owned()
        }
    }

    unsafe fn use_program(&self, program: Option<u32>) {
        let mut state = self.record(Call::UseProgram(program));
        match program {
            Some(name) if !state.programs.contains_key(&name) => {
                state.raise(glow::INVALID_VALUE);
            }
            _ => state.current_program = program,
        }
    }

    unsafe fn delete_program(&self, program: u32) {
        let mut state = self.record(Call::DeleteProgram(program));
        if state.programs.remove(&program).is_none() {
            state.raise(glow::INVALID_VALUE);
            return;
        }
        state.linked.remove(&program);
        if state.current_program == Some(program) {
            state.current_program = None;
        }
    }

    unsafe fn create_texture(&self) -> Result<u32, String> {
        let mut state = self.record(Call::CreateTexture);
        if state.fail_allocations {
            return Err("context lost".to_owned());
        }
        let name = state.allocate();
        state.textures.insert(name, Texture::default());
        Ok(name)
    }

    unsafe fn active_texture(&self, unit: u32) {
        let mut state = self.record(Call::ActiveTexture(unit));
        state.active_unit = unit;
    }

    unsafe fn bind_texture(&self, target: u32, texture: Option<u32>) {
        let mut state = self.record(Call::BindTexture(target, texture));
        let unit = state.active_unit;
        match texture {
            Some(name) if !state.textures.contains_key(&name) => {
                state.raise(glow::INVALID_OPERATION);
            }
            Some(name) => {
                state.bindings.insert(unit, name);
            }
            None => {
                state.bindings.remove(&unit);
            }
        }
    }

    unsafe fn tex_parameter_i32(&self, target: u32, parameter: u32, value: i32) {
        let mut state = self.record(Call::TexParameter(target, parameter, value));
        let Some(bound) = state.bound_texture() else {
            state.raise(glow::INVALID_OPERATION);
            return;
        };
        if let Some(texture) = state.textures.get_mut(&bound) {
            texture.parameters.insert(parameter, value);
        }
    }

    unsafe fn tex_image_2d_rgba(&self, _target: u32, width: i32, height: i32, pixels: &[u8]) {
        let mut state = self.record(Call::TexImage2d {
            width,
            height,
            len: pixels.len(),
        });
        let Some(bound) = state.bound_texture() else {
            state.raise(glow::INVALID_OPERATION);
            return;
        };
        if let Some(texture) = state.textures.get_mut(&bound) {
            texture.size = Some((width, height));
        }
    }

    unsafe fn delete_texture(&self, texture: u32) {
        let mut state = self.record(Call::DeleteTexture(texture));
        if state.textures.remove(&texture).is_none() {
            state.raise(glow::INVALID_VALUE);
            return;
        }
        state.bindings.retain(|_, bound| *bound != texture);
    }

    unsafe fn delete_buffer(&self, buffer: u32) {
        let mut state = self.record(Call::DeleteBuffer(buffer));
        if !state.buffers.remove(&buffer) {
            state.raise(glow::INVALID_VALUE);
        }
    }

    unsafe fn get_error(&self) -> u32 {
        self.state
            .borrow_mut()
            .errors
            .pop_front()
            .unwrap_or(glow::NO_ERROR)
    }
}
