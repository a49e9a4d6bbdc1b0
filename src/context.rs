//! The subset of the GL API the helpers are written against.
//!
//! [`GraphicsContext`] is implemented for every [`glow::HasContext`], so a
//! [`glow::Context`] created from a WebGL1 context on wasm32, or from a
//! native loader on desktop, can be passed straight to the helpers.
//!
//! The context carries ambient state shared by every caller on the
//! rendering thread. Three methods change it:
//!
//! - [`use_program`](GraphicsContext::use_program) replaces the current
//!   program,
//! - [`active_texture`](GraphicsContext::active_texture) selects the current
//!   texture unit,
//! - [`bind_texture`](GraphicsContext::bind_texture) replaces the texture
//!   bound to the current unit.
//!
//! No locking is done anywhere in the crate; callers serialize their own use
//! of a context.

use std::fmt::Debug;

use glow::{HasContext, PixelUnpackData};

use crate::error::{Error, Result};

/// Upper bound on error flags drained in one go. A context can hold one flag
/// per error kind, so this is never reached by a conforming driver.
const MAX_PENDING_ERRORS: usize = 32;

/// GL object creation, configuration and deletion.
///
/// Method names and arguments follow the GL entry points they wrap.
///
/// # Safety
///
/// Every method issues a raw GL call. Callers must ensure the context is
/// current on this thread and that handles passed in were created by this
/// context.
pub trait GraphicsContext {
    /// Shader object handle.
    type Shader: Copy + Debug + PartialEq;
    /// Program object handle.
    type Program: Copy + Debug + PartialEq;
    /// Texture object handle.
    type Texture: Copy + Debug + PartialEq;
    /// Buffer object handle.
    type Buffer: Copy + Debug + PartialEq;

    /// `createShader`. Errors carry the driver message.
    unsafe fn create_shader(&self, shader_type: u32) -> Result<Self::Shader, String>;
    /// `shaderSource`.
    unsafe fn shader_source(&self, shader: Self::Shader, source: &str);
    /// `compileShader`.
    unsafe fn compile_shader(&self, shader: Self::Shader);
    /// `getShaderParameter(COMPILE_STATUS)`.
    unsafe fn shader_compile_status(&self, shader: Self::Shader) -> bool;
    /// `getShaderInfoLog`.
    unsafe fn shader_info_log(&self, shader: Self::Shader) -> String;
    /// `deleteShader`.
    unsafe fn delete_shader(&self, shader: Self::Shader);

    /// `createProgram`. Errors carry the driver message.
    unsafe fn create_program(&self) -> Result<Self::Program, String>;
    /// `attachShader`.
    unsafe fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    /// `detachShader`.
    unsafe fn detach_shader(&self, program: Self::Program, shader: Self::Shader);
    /// `linkProgram`.
    unsafe fn link_program(&self, program: Self::Program);
    /// `getProgramParameter(LINK_STATUS)`.
    unsafe fn program_link_status(&self, program: Self::Program) -> bool;
    /// `getProgramInfoLog`.
    unsafe fn program_info_log(&self, program: Self::Program) -> String;
    /// `useProgram`. Replaces the context's current program.
    unsafe fn use_program(&self, program: Option<Self::Program>);
    /// `deleteProgram`.
    unsafe fn delete_program(&self, program: Self::Program);

    /// `createTexture`. Errors carry the driver message.
    unsafe fn create_texture(&self) -> Result<Self::Texture, String>;
    /// `activeTexture`. Selects the context's current texture unit.
    unsafe fn active_texture(&self, unit: u32);
    /// `bindTexture`. Replaces the texture bound to the current unit.
    unsafe fn bind_texture(&self, target: u32, texture: Option<Self::Texture>);
    /// `texParameteri`.
    unsafe fn tex_parameter_i32(&self, target: u32, parameter: u32, value: i32);
    /// `texImage2D` at level 0 with `RGBA`/`UNSIGNED_BYTE` pixel data.
    unsafe fn tex_image_2d_rgba(&self, target: u32, width: i32, height: i32, pixels: &[u8]);
    /// `deleteTexture`.
    unsafe fn delete_texture(&self, texture: Self::Texture);

    /// `deleteBuffer`.
    unsafe fn delete_buffer(&self, buffer: Self::Buffer);

    /// `getError`. Returns and clears one pending error flag.
    unsafe fn get_error(&self) -> u32;
}

impl<T: HasContext> GraphicsContext for T {
    type Shader = T::Shader;
    type Program = T::Program;
    type Texture = T::Texture;
    type Buffer = T::Buffer;

    unsafe fn create_shader(&self, shader_type: u32) -> Result<Self::Shader, String> {
        unsafe { HasContext::create_shader(self, shader_type) }
    }

    unsafe fn shader_source(&self, shader: Self::Shader, source: &str) {
        unsafe { HasContext::shader_source(self, shader, source) }
    }

    unsafe fn compile_shader(&self, shader: Self::Shader) {
        unsafe { HasContext::compile_shader(self, shader) }
    }

    unsafe fn shader_compile_status(&self, shader: Self::Shader) -> bool {
        unsafe { HasContext::get_shader_compile_status(self, shader) }
    }

    unsafe fn shader_info_log(&self, shader: Self::Shader) -> String {
        unsafe { HasContext::get_shader_info_log(self, shader) }
    }

    unsafe fn delete_shader(&self, shader: Self::Shader) {
        unsafe { HasContext::delete_shader(self, shader) }
    }

    unsafe fn create_program(&self) -> Result<Self::Program, String> {
        unsafe { HasContext::create_program(self) }
    }

    unsafe fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { HasContext::attach_shader(self, program, shader) }
    }

    unsafe fn detach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { HasContext::detach_shader(self, program, shader) }
    }

    unsafe fn link_program(&self, program: Self::Program) {
        unsafe { HasContext::link_program(self, program) }
    }

    unsafe fn program_link_status(&self, program: Self::Program) -> bool {
        unsafe { HasContext::get_program_link_status(self, program) }
    }

    unsafe fn program_info_log(&self, program: Self::Program) -> String {
        unsafe { HasContext::get_program_info_log(self, program) }
    }

    unsafe fn use_program(&self, program: Option<Self::Program>) {
        unsafe { HasContext::use_program(self, program) }
    }

    unsafe fn delete_program(&self, program: Self::Program) {
        unsafe { HasContext::delete_program(self, program) }
    }

    unsafe fn create_texture(&self) -> Result<Self::Texture, String> {
        unsafe { HasContext::create_texture(self) }
    }

    unsafe fn active_texture(&self, unit: u32) {
        unsafe { HasContext::active_texture(self, unit) }
    }

    unsafe fn bind_texture(&self, target: u32, texture: Option<Self::Texture>) {
        unsafe { HasContext::bind_texture(self, target, texture) }
    }

    unsafe fn tex_parameter_i32(&self, target: u32, parameter: u32, value: i32) {
        unsafe { HasContext::tex_parameter_i32(self, target, parameter, value) }
    }

    unsafe fn tex_image_2d_rgba(&self, target: u32, width: i32, height: i32, pixels: &[u8]) {
        // GL constant values are small enough that the cast is always safe.
        #[expect(clippy::cast_possible_wrap)]
        unsafe {
            HasContext::tex_image_2d(
                self,
                target,
                0,
                glow::RGBA as i32,
                width,
                height,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                PixelUnpackData::Slice(Some(pixels)),
            );
        }
    }

    unsafe fn delete_texture(&self, texture: Self::Texture) {
        unsafe { HasContext::delete_texture(self, texture) }
    }

    unsafe fn delete_buffer(&self, buffer: Self::Buffer) {
        unsafe { HasContext::delete_buffer(self, buffer) }
    }

    unsafe fn get_error(&self) -> u32 {
        unsafe { HasContext::get_error(self) }
    }
}

/// Read and clear every pending error flag on the context.
///
/// Returns the flags in the order the driver reported them; an empty vector
/// means the context had no pending errors.
///
/// # Safety
///
/// Requires a valid, current GL context.
pub unsafe fn take_driver_errors<G: GraphicsContext>(gl: &G) -> Vec<u32> {
    let mut errors = Vec::new();
    while errors.len() < MAX_PENDING_ERRORS {
        let code = unsafe { gl.get_error() };
        if code == glow::NO_ERROR {
            break;
        }
        errors.push(code);
    }
    errors
}

/// Fail with [`Error::Driver`] if the call just issued raised an error flag.
///
/// # Safety
///
/// Requires a valid, current GL context.
pub(crate) unsafe fn check_call<G: GraphicsContext>(gl: &G, call: &'static str) -> Result<()> {
    match unsafe { gl.get_error() } {
        glow::NO_ERROR => Ok(()),
        code => Err(Error::Driver { call, code }),
    }
}
