//! Helpers for creating and tearing down GL objects, on top of [glow].
//!
//! The crate wraps the handful of calls every small WebGL or OpenGL renderer
//! repeats: compiling a shader, linking a program, creating a texture
//! (optionally from an image scaled up to power-of-two dimensions, as WebGL1
//! requires for mipmapping and repeat wrapping), and deleting a batch of
//! objects on teardown.
//!
//! # Overview
//!
//! - [`create_shader`]: source -> compiled shader handle.
//! - [`create_program`]: two shaders -> linked program, made current.
//! - [`create_texture`]: optional image -> configured texture. Async,
//!   because the power-of-two resize is a suspension point (see
//!   [`Resampler`]).
//! - [`clean_resources`]: best-effort deletion of textures, buffers, shaders
//!   and a program.
//!
//! The helpers are stateless. All of them take the context by reference and
//! work with any [`GraphicsContext`], which is implemented for every
//! [`glow::HasContext`]. On wasm32 a WebGL1 context can be wrapped with
//! `glow::Context::from_webgl1_context`.
//!
//! # Errors
//!
//! The create helpers do not check compile or link status; use
//! [`check_shader`] / [`check_program`] or [`compile_program`] for that.
//! [`clean_resources`] never fails and returns a [`CleanupReport`] instead.
//!
//! # Safety
//!
//! Every helper issues raw GL calls and is `unsafe`: the context must be
//! valid and current on the calling thread, and handles must come from that
//! context. The context's current program, active texture unit and texture
//! bindings are shared state; the crate does no locking.
//!
//! [glow]: https://docs.rs/glow

mod cleanup;
mod context;
mod error;
mod resize;
mod shader;
mod texture;

#[cfg(test)]
mod testing;

pub use cleanup::{clean_resources, CleanupOptions, CleanupReport};
pub use context::{take_driver_errors, GraphicsContext};
pub use error::{Error, Result};
pub use resize::{
    power_of_two, power_of_two_size, resize_to_power_of_two, CanvasResampler, Resampler,
};
pub use shader::{
    check_program, check_shader, compile_program, create_program, create_shader, ShaderStage,
};
pub use texture::{create_texture, create_texture_with, texture_unit};
