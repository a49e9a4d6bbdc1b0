//! Best-effort bulk deletion of GL objects.
//!
//! Teardown must never take the caller down with it, so
//! [`clean_resources`] does not return an error. It checks the driver's
//! error flag after every call and stops at the first call that raised one;
//! the [`CleanupReport`] says how far it got.

use crate::context::{check_call, take_driver_errors, GraphicsContext};
use crate::error::Error;

/// The objects to delete. Every field is empty by default.
///
/// Shaders are only detached and deleted when a program is given.
pub struct CleanupOptions<G: GraphicsContext> {
    /// Textures to delete.
    pub textures: Vec<G::Texture>,
    /// Program to delete after its shaders.
    pub program: Option<G::Program>,
    /// Buffers to delete.
    pub buffers: Vec<G::Buffer>,
    /// Shaders to detach from `program` and delete.
    pub shaders: Vec<G::Shader>,
}

impl<G: GraphicsContext> Default for CleanupOptions<G> {
    fn default() -> Self {
        Self {
            textures: Vec::new(),
            program: None,
            buffers: Vec::new(),
            shaders: Vec::new(),
        }
    }
}

impl<G: GraphicsContext> CleanupOptions<G> {
    /// Nothing to delete.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delete these textures.
    #[must_use]
    pub fn textures(mut self, textures: impl IntoIterator<Item = G::Texture>) -> Self {
        self.textures = textures.into_iter().collect();
        self
    }

    /// Delete this program (and its listed shaders).
    #[must_use]
    pub fn program(mut self, program: G::Program) -> Self {
        self.program = Some(program);
        self
    }

    /// Delete these buffers.
    #[must_use]
    pub fn buffers(mut self, buffers: impl IntoIterator<Item = G::Buffer>) -> Self {
        self.buffers = buffers.into_iter().collect();
        self
    }

    /// Detach these shaders from the program and delete them.
    #[must_use]
    pub fn shaders(mut self, shaders: impl IntoIterator<Item = G::Shader>) -> Self {
        self.shaders = shaders.into_iter().collect();
        self
    }
}

impl<G: GraphicsContext> std::fmt::Debug for CleanupOptions<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CleanupOptions")
            .field("textures", &self.textures)
            .field("program", &self.program)
            .field("buffers", &self.buffers)
            .field("shaders", &self.shaders)
            .finish()
    }
}

/// What [`clean_resources`] managed to delete.
#[derive(Debug, Default)]
pub struct CleanupReport {
    /// Textures deleted.
    pub textures: usize,
    /// Buffers deleted.
    pub buffers: usize,
    /// Shaders detached and deleted.
    pub shaders: usize,
    /// Whether the program was deleted.
    pub program: bool,
    /// The call that cut the sequence short, if any.
    pub failure: Option<Error>,
}

impl CleanupReport {
    /// `true` if every requested deletion was issued without a driver error.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

/// Delete the objects named in `options`.
///
/// Order: every texture, every buffer, then, if a program is given, each
/// shader is detached from it and deleted before the program itself is
/// deleted. Errors pending before the call are drained first so they are not
/// blamed on a deletion.
///
/// The first call that raises a driver error stops the sequence: nothing
/// after it is attempted, and the error is recorded in
/// [`CleanupReport::failure`]. A shader that fails to detach is therefore
/// neither deleted nor followed by the program deletion.
///
/// # Safety
///
/// Requires a valid, current GL context.
#[must_use = "the report is the only record of a cleanup that stopped early"]
pub unsafe fn clean_resources<G: GraphicsContext>(
    gl: &G,
    options: CleanupOptions<G>,
) -> CleanupReport {
    let stale = unsafe { take_driver_errors(gl) };
    if !stale.is_empty() {
        tracing::trace!(?stale, "discarded pending GL errors before cleanup");
    }

    let mut report = CleanupReport::default();
    if let Err(err) = unsafe { delete_all(gl, &options, &mut report) } {
        tracing::warn!(error = %err, ?report, "GL cleanup stopped early");
        report.failure = Some(err);
    } else {
        tracing::debug!(?report, "GL cleanup complete");
    }
    report
}

unsafe fn delete_all<G: GraphicsContext>(
    gl: &G,
    options: &CleanupOptions<G>,
    report: &mut CleanupReport,
) -> Result<(), Error> {
    for &texture in &options.textures {
        unsafe {
            gl.delete_texture(texture);
            check_call(gl, "deleteTexture")?;
        }
        report.textures += 1;
    }

    for &buffer in &options.buffers {
        unsafe {
            gl.delete_buffer(buffer);
            check_call(gl, "deleteBuffer")?;
        }
        report.buffers += 1;
    }

    let Some(program) = options.program else {
        return Ok(());
    };
    for &shader in &options.shaders {
        unsafe {
            gl.detach_shader(program, shader);
            check_call(gl, "detachShader")?;
            gl.delete_shader(shader);
            check_call(gl, "deleteShader")?;
        }
        report.shaders += 1;
    }
    unsafe {
        gl.delete_program(program);
        check_call(gl, "deleteProgram")?;
    }
    report.program = true;
    Ok(())
}
