//! Error type shared by every helper in the crate.

/// Errors produced by the GL helpers.
///
/// The create operations only fail when the driver cannot allocate an
/// object or when image data cannot be prepared for upload. Compile and link
/// failures are reported solely by the explicit check helpers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The driver refused to create an object, usually because the context
    /// was lost.
    #[error("failed to create {object}: {message}")]
    Allocation {
        /// Kind of object, e.g. `"shader"`.
        object: &'static str,
        /// Message reported by the driver.
        message: String,
    },

    /// A shader failed to compile. Carries the shader info log.
    #[error("shader compile error: {0}")]
    Compile(String),

    /// A program failed to link. Carries the program info log.
    #[error("program link error: {0}")]
    Link(String),

    /// A GL call raised an error flag.
    #[error("{call} raised GL error 0x{code:04X}")]
    Driver {
        /// Name of the GL call that raised the flag.
        call: &'static str,
        /// Value returned by `getError`.
        code: u32,
    },

    /// The image has a zero width or height.
    #[error("cannot resize an empty {width}x{height} image")]
    EmptyImage {
        /// Source width.
        width: u32,
        /// Source height.
        height: u32,
    },

    /// The power-of-two size of the image does not fit a GL size.
    #[error("{width}x{height} image is too large for a power-of-two texture")]
    ImageTooLarge {
        /// Source width.
        width: u32,
        /// Source height.
        height: u32,
    },

    /// A [`Resampler`](crate::Resampler) returned an image of the wrong size.
    #[error("resampler returned {actual_width}x{actual_height}, expected {width}x{height}")]
    ResampledSize {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
        /// Width of the returned image.
        actual_width: u32,
        /// Height of the returned image.
        actual_height: u32,
    },

    /// `TEXTURE0 + index` does not name a texture unit.
    #[error("texture unit index {0} is out of range")]
    TextureUnit(u32),

    /// The resized canvas could not be exported.
    #[error("failed to export resized image")]
    Export(#[source] image::ImageError),

    /// The exported canvas could not be decoded back into an image.
    #[error("failed to decode resized image")]
    Decode(#[source] image::ImageError),
}

/// Result type used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
