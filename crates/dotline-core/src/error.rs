use thiserror::Error;

/// Errors raised by the crate's own fallible entry points.
///
/// Failures of the attached memory subsystem are not wrapped here; they are
/// returned unmodified as the bus's associated error type.
#[derive(Error, Debug)]
pub enum Error {
    /// A VRAM image did not cover the 16 KiB PPU address space.
    #[error("VRAM image expected {expected} bytes, got {actual}")]
    ImageSize { expected: usize, actual: usize },

    /// A savestate field is outside the range the hardware can hold.
    #[error("invalid savestate field `{field}`: {value}")]
    InvalidState { field: &'static str, value: u32 },

    /// Savestate bytes could not be decoded.
    #[cfg(feature = "savestate-postcard")]
    #[error("savestate encoding error: {0}")]
    Encoding(#[from] postcard::Error),
}
