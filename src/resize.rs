//! Power-of-two resizing for texture uploads.
//!
//! WebGL1 only supports mipmapping and repeat wrapping on textures whose
//! sides are powers of two, so images are scaled up to the next power of two
//! on each axis before upload. The work goes through a [`Resampler`], which
//! is the single suspension point of the texture builder.

use std::future::Future;
use std::io::Cursor;

use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, ImageFormat, RgbaImage};

use crate::error::{Error, Result};

/// Largest dimension a GL call accepts (`GLsizei` is an `i32`).
const MAX_GL_SIZE: u32 = i32::MAX.unsigned_abs();

/// The smallest power of two that is `>= dimension`.
///
/// Returns `None` for `0`, which has no power-of-two bound, and for values
/// whose power of two does not fit a GL size.
#[must_use]
pub fn power_of_two(dimension: u32) -> Option<u32> {
    if dimension == 0 {
        return None;
    }
    dimension
        .checked_next_power_of_two()
        .filter(|size| *size <= MAX_GL_SIZE)
}

/// Power-of-two target size for a `width` x `height` image, computed
/// independently per axis.
///
/// # Errors
///
/// [`Error::EmptyImage`] if either side is zero, [`Error::ImageTooLarge`] if
/// either side has no power of two that fits a GL size.
pub fn power_of_two_size(width: u32, height: u32) -> Result<(u32, u32)> {
    if width == 0 || height == 0 {
        return Err(Error::EmptyImage { width, height });
    }
    match (power_of_two(width), power_of_two(height)) {
        (Some(w), Some(h)) => Ok((w, h)),
        _ => Err(Error::ImageTooLarge { width, height }),
    }
}

/// Scales an image to an exact size, possibly asynchronously.
///
/// Implementations may suspend (waiting on a decoder, a worker or the
/// browser). The returned future must resolve to an image of exactly
/// `width` x `height` pixels, or to an error describing why it could not.
pub trait Resampler {
    /// Scale `image` to `width` x `height` RGBA pixels.
    fn resample(
        &self,
        image: &DynamicImage,
        width: u32,
        height: u32,
    ) -> impl Future<Output = Result<RgbaImage>>;
}

/// The offscreen-canvas round trip, done on the CPU.
///
/// The image is drawn scaled onto a `width` x `height` RGBA canvas with
/// bilinear filtering, the canvas is exported as PNG, and the PNG is decoded
/// again. Export and decode failures are reported instead of being lost.
///
/// The work is plain CPU work and the future completes on its first poll,
/// so the executor is blocked for the whole resize. On the wasm main thread a
/// large image stalls the page; implement [`Resampler`] over a worker or the
/// browser's image decoder when the resize must actually yield.
#[derive(Clone, Copy, Debug, Default)]
pub struct CanvasResampler;

impl CanvasResampler {
    fn draw(image: &DynamicImage, width: u32, height: u32) -> RgbaImage {
        imageops::resize(image, width, height, FilterType::Triangle)
    }

    fn export(canvas: &RgbaImage) -> Result<Vec<u8>> {
        let mut encoded = Vec::new();
        canvas
            .write_to(&mut Cursor::new(&mut encoded), ImageFormat::Png)
            .map_err(Error::Export)?;
        Ok(encoded)
    }

    fn decode(encoded: &[u8]) -> Result<RgbaImage> {
        image::load_from_memory_with_format(encoded, ImageFormat::Png)
            .map(DynamicImage::into_rgba8)
            .map_err(Error::Decode)
    }
}

impl Resampler for CanvasResampler {
    async fn resample(&self, image: &DynamicImage, width: u32, height: u32) -> Result<RgbaImage> {
        let canvas = Self::draw(image, width, height);
        let encoded = Self::export(&canvas)?;
        Self::decode(&encoded)
    }
}

/// Redraw `image` at its power-of-two size.
///
/// Suspends until the resampler has finished.
///
/// # Errors
///
/// Fails for empty or oversized images (see [`power_of_two_size`]), with
/// whatever error the resampler reports, and with [`Error::ResampledSize`]
/// if the resampler returns the wrong size.
pub async fn resize_to_power_of_two<R: Resampler>(
    resampler: &R,
    image: &DynamicImage,
) -> Result<RgbaImage> {
    let (width, height) = image.dimensions();
    let (target_width, target_height) = power_of_two_size(width, height)?;
    tracing::trace!(
        width,
        height,
        target_width,
        target_height,
        "resizing image to power of two"
    );
    let resized = resampler.resample(image, target_width, target_height).await?;
    let (actual_width, actual_height) = resized.dimensions();
    if (actual_width, actual_height) != (target_width, target_height) {
        return Err(Error::ResampledSize {
            width: target_width,
            height: target_height,
            actual_width,
            actual_height,
        });
    }
    Ok(resized)
}
