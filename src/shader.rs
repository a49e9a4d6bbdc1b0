//! Shader compilation and program linking.
//!
//! [`create_shader`] and [`create_program`] are thin wrappers: they never
//! look at compile or link status, so a handle is returned even for source
//! that does not compile. Use [`check_shader`] and [`check_program`] to
//! surface the driver's info log, or [`compile_program`] to do everything
//! in one step.

use crate::context::GraphicsContext;
use crate::error::{Error, Result};

/// Pipeline stage a shader is compiled for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// `VERTEX_SHADER`.
    Vertex,
    /// `FRAGMENT_SHADER`.
    Fragment,
}

impl ShaderStage {
    /// The GL enum naming this stage.
    #[must_use]
    pub const fn gl_enum(self) -> u32 {
        match self {
            Self::Vertex => glow::VERTEX_SHADER,
            Self::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

/// Create a shader of the given stage, attach `source` and compile it.
///
/// The compile status is not checked: invalid source still yields a handle.
///
/// # Safety
///
/// Requires a valid, current GL context.
///
/// # Errors
///
/// [`Error::Allocation`] if the driver cannot create the shader object.
pub unsafe fn create_shader<G: GraphicsContext>(
    gl: &G,
    stage: ShaderStage,
    source: &str,
) -> Result<G::Shader> {
    let shader = unsafe { gl.create_shader(stage.gl_enum()) }.map_err(|message| {
        Error::Allocation {
            object: "shader",
            message,
        }
    })?;
    unsafe {
        gl.shader_source(shader, source);
        gl.compile_shader(shader);
    }
    tracing::trace!(?stage, ?shader, len = source.len(), "compiled shader");
    Ok(shader)
}

/// Create a program from a vertex and a fragment shader, link it and make it
/// the current program.
///
/// The link status is not checked. Replaces the context's current program.
///
/// # Safety
///
/// Requires a valid, current GL context, and both shaders must belong to it.
///
/// # Errors
///
/// [`Error::Allocation`] if the driver cannot create the program object.
pub unsafe fn create_program<G: GraphicsContext>(
    gl: &G,
    vertex: G::Shader,
    fragment: G::Shader,
) -> Result<G::Program> {
    let program = unsafe { gl.create_program() }.map_err(|message| Error::Allocation {
        object: "program",
        message,
    })?;
    unsafe {
        gl.attach_shader(program, vertex);
        gl.attach_shader(program, fragment);
        gl.link_program(program);
        gl.use_program(Some(program));
    }
    tracing::trace!(?program, ?vertex, ?fragment, "linked program");
    Ok(program)
}

/// Check that `shader` compiled.
///
/// # Safety
///
/// Requires a valid, current GL context.
///
/// # Errors
///
/// [`Error::Compile`] carrying the shader info log.
pub unsafe fn check_shader<G: GraphicsContext>(gl: &G, shader: G::Shader) -> Result<()> {
    if unsafe { gl.shader_compile_status(shader) } {
        Ok(())
    } else {
        Err(Error::Compile(unsafe { gl.shader_info_log(shader) }))
    }
}

/// Check that `program` linked.
///
/// # Safety
///
/// Requires a valid, current GL context.
///
/// # Errors
///
/// [`Error::Link`] carrying the program info log.
pub unsafe fn check_program<G: GraphicsContext>(gl: &G, program: G::Program) -> Result<()> {
    if unsafe { gl.program_link_status(program) } {
        Ok(())
    } else {
        Err(Error::Link(unsafe { gl.program_info_log(program) }))
    }
}

/// Compile both stages, link them, and leave the program current.
///
/// Unlike the individual wrappers, every step is checked. On failure all
/// objects created so far are deleted. On success the shader objects are
/// detached and deleted, so only the program handle needs to be cleaned up
/// by the caller.
///
/// # Safety
///
/// Requires a valid, current GL context.
///
/// # Errors
///
/// [`Error::Allocation`], [`Error::Compile`] or [`Error::Link`].
pub unsafe fn compile_program<G: GraphicsContext>(
    gl: &G,
    vertex_src: &str,
    fragment_src: &str,
) -> Result<G::Program> {
    let vs = unsafe { compile_checked(gl, ShaderStage::Vertex, vertex_src) }?;
    let fs = match unsafe { compile_checked(gl, ShaderStage::Fragment, fragment_src) } {
        Ok(fs) => fs,
        Err(err) => {
            unsafe { gl.delete_shader(vs) };
            return Err(err);
        }
    };

    let program = match unsafe { create_program(gl, vs, fs) } {
        Ok(program) => program,
        Err(err) => {
            unsafe {
                gl.delete_shader(vs);
                gl.delete_shader(fs);
            }
            return Err(err);
        }
    };

    let linked = unsafe { check_program(gl, program) };
    unsafe {
        // Shaders are no longer needed once the program is linked (or failed).
        gl.detach_shader(program, vs);
        gl.detach_shader(program, fs);
        gl.delete_shader(vs);
        gl.delete_shader(fs);
    }
    if let Err(err) = linked {
        unsafe {
            gl.use_program(None);
            gl.delete_program(program);
        }
        return Err(err);
    }

    Ok(program)
}

/// Compile a single stage, deleting the shader again if it did not compile.
unsafe fn compile_checked<G: GraphicsContext>(
    gl: &G,
    stage: ShaderStage,
    source: &str,
) -> Result<G::Shader> {
    let shader = unsafe { create_shader(gl, stage, source) }?;
    if let Err(err) = unsafe { check_shader(gl, shader) } {
        unsafe { gl.delete_shader(shader) };
        return Err(err);
    }
    Ok(shader)
}
