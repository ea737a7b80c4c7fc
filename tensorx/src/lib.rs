//! Codec for the tensor exchange format spoken by the image-generation service.
//!
//! A tensor exchange buffer is a fixed 68-byte header (17 little-endian `u32`s)
//! followed by an NHWC payload of IEEE-754 half-precision floats. This crate
//! converts between that format and plain RGB8 pixel buffers:
//! - [`encode`] turns a [`PixelBuffer`] into a 3-channel tensor buffer.
//! - [`decode`] turns a 3-channel (RGB) or 4-channel (latent) tensor buffer back
//!   into a [`PixelBuffer`]. Latents go through the fixed [`ColorMatrix`]
//!   [`SD_LATENT_TO_RGB`], which is an approximate preview, not an inverse.
//! - [`DecodedTensor`] exposes the validated payload when callers need to look
//!   at the header or raw element values before converting.
//!
//! Compressed payloads are detected and rejected with
//! [`Error::CompressionUnsupported`]; this crate never decompresses.
//!
//! For a file-based walkthrough, see the companion `tensorx-convert` CLI.

mod color;
mod decoder;
mod encoder;
mod error;
mod header;
mod pixel;

pub use color::{ColorMatrix, SD_LATENT_TO_RGB};
pub use decoder::{DecodedTensor, TensorPayload, decode};
pub use encoder::encode;
pub use error::{Error, Result};
pub use header::{
    COMPRESSION_FPZIP, COMPRESSION_NONE, ELEMENT_F16, HEADER_LEN, HEADER_WORDS, LAYOUT_NHWC,
    MEMORY_CPU, TensorHeader, read_header, write_header,
};
pub use pixel::{PixelBuffer, RGB_CHANNELS};

/// Channel count of a latent tensor.
pub const LATENT_CHANNELS: usize = 4;

/// Bytes per half-precision payload element.
pub const ELEMENT_SIZE: usize = 2;
