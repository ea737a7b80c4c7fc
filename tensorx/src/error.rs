use thiserror::Error;

/// Error produced while encoding or decoding tensor exchange buffers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Buffer too short to hold the fixed header.
    #[error("invalid header: buffer is {len} bytes, need at least 68")]
    InvalidHeader { len: usize },

    /// Payload is compressed with a scheme this codec does not implement.
    #[error("compressed tensor payload (flag {flag:#x}) is not supported")]
    CompressionUnsupported { flag: u32 },

    /// Header declares a channel count other than 3 or 4.
    #[error("unsupported channel count {channels}, expected 3 (rgb) or 4 (latent)")]
    UnsupportedChannelCount { channels: u32 },

    /// Declared dimensions need more bytes than the buffer holds.
    #[error("size mismatch: header declares {expected} bytes, buffer has {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// Pixel data length does not match `width * height * 3`.
    #[error("pixel buffer of {len} bytes does not match {width}x{height} rgb")]
    InvalidPixelBuffer { width: u32, height: u32, len: usize },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
