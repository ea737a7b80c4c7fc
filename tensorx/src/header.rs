//! Fixed 68-byte tensor header.
//!
//! Layout (17 little-endian `u32` words):
//!
//! | word | field |
//! |---|---|
//! | 0 | compression flag |
//! | 1 | memory kind |
//! | 2 | layout |
//! | 3 | element kind |
//! | 4 | reserved |
//! | 5 | batch (N) |
//! | 6 | height (H) |
//! | 7 | width (W) |
//! | 8 | channels (C) |
//! | 9..=16 | reserved |

use bytes::{Buf, BufMut};

use crate::ELEMENT_SIZE;
use crate::error::{Error, Result};

/// Number of `u32` words in the header.
pub const HEADER_WORDS: usize = 17;
/// Header size in bytes.
pub const HEADER_LEN: usize = HEADER_WORDS * 4;

/// Uncompressed payload.
pub const COMPRESSION_NONE: u32 = 0;
/// Payload compressed with fpzip.
pub const COMPRESSION_FPZIP: u32 = 1_012_247;
/// Host memory tag.
pub const MEMORY_CPU: u32 = 0x1;
/// Channel-last layout tag.
pub const LAYOUT_NHWC: u32 = 0x2;
/// Half-precision element tag.
pub const ELEMENT_F16: u32 = 0x20000;

/// Decoded header fields. Reserved words are not kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TensorHeader {
    pub compression: u32,
    pub memory_kind: u32,
    pub layout: u32,
    pub element_kind: u32,
    pub batch: u32,
    pub height: u32,
    pub width: u32,
    pub channels: u32,
}

impl TensorHeader {
    /// Uncompressed host NHWC f16 header for a single image.
    pub fn new(height: u32, width: u32, channels: u32) -> Self {
        Self {
            compression: COMPRESSION_NONE,
            memory_kind: MEMORY_CPU,
            layout: LAYOUT_NHWC,
            element_kind: ELEMENT_F16,
            batch: 1,
            height,
            width,
            channels,
        }
    }

    pub fn is_compressed(&self) -> bool {
        self.compression == COMPRESSION_FPZIP
    }

    /// Elements in the payload, `N*H*W*C`. A batch of 0 counts as 1.
    ///
    /// Saturates instead of overflowing, so an absurd header yields a length
    /// no real buffer can satisfy.
    pub fn element_count(&self) -> usize {
        [self.height, self.width, self.channels]
            .into_iter()
            .fold(self.batch.max(1) as usize, |acc, d| {
                acc.saturating_mul(d as usize)
            })
    }

    /// Payload size in bytes.
    pub fn payload_len(&self) -> usize {
        self.element_count().saturating_mul(ELEMENT_SIZE)
    }

    /// Minimum size of a buffer carrying this header.
    pub fn expected_len(&self) -> usize {
        self.payload_len().saturating_add(HEADER_LEN)
    }

    /// Append the 17 header words to `buf`.
    pub fn write_to<B: BufMut>(&self, buf: &mut B) {
        let words = [
            self.compression,
            self.memory_kind,
            self.layout,
            self.element_kind,
            0,
            self.batch,
            self.height,
            self.width,
            self.channels,
        ];
        for word in words {
            buf.put_u32_le(word);
        }
        for _ in words.len()..HEADER_WORDS {
            buf.put_u32_le(0);
        }
    }

    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        self.write_to(&mut &mut out[..]);
        out
    }

    /// Parse the header from the start of `buf`.
    ///
    /// Only the length is checked; provenance tags are taken as-is.
    pub fn read(buf: &[u8]) -> Result<Self> {
        if buf.len() < HEADER_LEN {
            return Err(Error::InvalidHeader { len: buf.len() });
        }
        let mut cur = &buf[..HEADER_LEN];
        let compression = cur.get_u32_le();
        let memory_kind = cur.get_u32_le();
        let layout = cur.get_u32_le();
        let element_kind = cur.get_u32_le();
        let _reserved = cur.get_u32_le();
        let batch = cur.get_u32_le();
        let height = cur.get_u32_le();
        let width = cur.get_u32_le();
        let channels = cur.get_u32_le();
        Ok(Self {
            compression,
            memory_kind,
            layout,
            element_kind,
            batch,
            height,
            width,
            channels,
        })
    }
}

/// Serialize an uncompressed header for a single `height x width x channels` image.
pub fn write_header(height: u32, width: u32, channels: u32) -> [u8; HEADER_LEN] {
    TensorHeader::new(height, width, channels).to_bytes()
}

/// Parse the header at the start of `buf`.
pub fn read_header(buf: &[u8]) -> Result<TensorHeader> {
    TensorHeader::read(buf)
}
