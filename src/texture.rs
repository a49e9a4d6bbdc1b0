//! Texture creation with fixed sampling parameters.

use image::{DynamicImage, RgbaImage};

use crate::context::GraphicsContext;
use crate::error::{Error, Result};
use crate::resize::{power_of_two_size, resize_to_power_of_two, CanvasResampler, Resampler};

/// The `TEXTURE0 + index` enum for a texture unit index.
///
/// # Errors
///
/// [`Error::TextureUnit`] if the sum overflows.
pub fn texture_unit(index: u32) -> Result<u32> {
    glow::TEXTURE0
        .checked_add(index)
        .ok_or(Error::TextureUnit(index))
}

/// Create a texture on unit `TEXTURE0 + index`, optionally filled from
/// `image` resized to power-of-two dimensions.
///
/// Uses the [`CanvasResampler`]. See [`create_texture_with`] for details.
///
/// # Safety
///
/// Requires a valid GL context that is current whenever the future is
/// polled.
///
/// # Errors
///
/// See [`create_texture_with`].
pub async unsafe fn create_texture<G: GraphicsContext>(
    gl: &G,
    index: u32,
    image: Option<&DynamicImage>,
) -> Result<G::Texture> {
    unsafe { create_texture_with(gl, &CanvasResampler, index, image) }.await
}

/// Create a texture on unit `TEXTURE0 + index` using `resampler` for the
/// power-of-two resize.
///
/// The texture is bound as `TEXTURE_2D` and configured with nearest
/// filtering and clamp-to-edge wrapping on both axes. Without an image it is
/// left empty and the future resolves without suspending.
///
/// With an image, the future suspends until `resampler` has produced the
/// power-of-two copy, then the unit is activated and the texture rebound
/// (the ambient bindings may have changed while suspended) and the resized
/// pixels are uploaded as `RGBA`/`UNSIGNED_BYTE`. The upload uses the
/// resized dimensions.
///
/// On return the context's active texture unit is `TEXTURE0 + index` with
/// the new texture bound to it. The resize cannot be cancelled: dropping the
/// future early leaves the texture allocated and empty.
///
/// # Safety
///
/// Requires a valid GL context that is current whenever the future is
/// polled.
///
/// # Errors
///
/// [`Error::TextureUnit`], [`Error::EmptyImage`], [`Error::ImageTooLarge`]
/// and [`Error::Allocation`] before any GL state is touched. Resampling
/// errors ([`Error::ResampledSize`] or the resampler's own) after the
/// texture has been deleted again.
pub async unsafe fn create_texture_with<G: GraphicsContext, R: Resampler>(
    gl: &G,
    resampler: &R,
    index: u32,
    image: Option<&DynamicImage>,
) -> Result<G::Texture> {
    let unit = texture_unit(index)?;
    if let Some(image) = image {
        power_of_two_size(image.width(), image.height())?;
    }
    let texture = unsafe { gl.create_texture() }.map_err(|message| Error::Allocation {
        object: "texture",
        message,
    })?;
    unsafe {
        bind(gl, unit, texture);
        set_sampling_params(gl);
    }

    let Some(image) = image else {
        tracing::trace!(?texture, index, "created empty texture");
        return Ok(texture);
    };

    match resize_to_power_of_two(resampler, image).await {
        Ok(resized) => {
            unsafe {
                bind(gl, unit, texture);
                upload(gl, &resized);
            }
            tracing::trace!(
                ?texture,
                index,
                width = resized.width(),
                height = resized.height(),
                "uploaded texture"
            );
            Ok(texture)
        }
        Err(err) => {
            tracing::debug!(?texture, index, error = %err, "texture resize failed");
            unsafe { gl.delete_texture(texture) };
            Err(err)
        }
    }
}

/// Activate `unit` and bind `texture` to it.
///
/// Changes the context's active texture unit and its `TEXTURE_2D` binding.
unsafe fn bind<G: GraphicsContext>(gl: &G, unit: u32, texture: G::Texture) {
    unsafe {
        gl.active_texture(unit);
        gl.bind_texture(glow::TEXTURE_2D, Some(texture));
    }
}

/// Nearest filtering, clamp-to-edge wrapping.
unsafe fn set_sampling_params<G: GraphicsContext>(gl: &G) {
    // GL constant values are small enough that the cast is always safe.
    #[expect(clippy::cast_possible_wrap)]
    unsafe {
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_MIN_FILTER,
            glow::NEAREST as i32,
        );
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_MAG_FILTER,
            glow::NEAREST as i32,
        );
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_WRAP_S,
            glow::CLAMP_TO_EDGE as i32,
        );
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_WRAP_T,
            glow::CLAMP_TO_EDGE as i32,
        );
    }
}

/// Upload `pixels` to the texture bound to the active unit.
///
/// Resized images never exceed `i32::MAX` on either side.
unsafe fn upload<G: GraphicsContext>(gl: &G, pixels: &RgbaImage) {
    #[expect(clippy::cast_possible_wrap)]
    let (width, height) = (pixels.width() as i32, pixels.height() as i32);
    unsafe { gl.tex_image_2d_rgba(glow::TEXTURE_2D, width, height, pixels.as_raw()) };
}
