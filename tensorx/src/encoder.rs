use bytes::BufMut;
use half::f16;

use crate::ELEMENT_SIZE;
use crate::header::{HEADER_LEN, TensorHeader};
use crate::pixel::{PixelBuffer, RGB_CHANNELS};

/// Encode an RGB8 image as an uncompressed 3-channel f16 NHWC tensor.
///
/// Each sample `s` is mapped to `s / 255 * 2 - 1` and rounded to the nearest
/// half-precision value. The result is `68 + height * width * 6` bytes.
pub fn encode(pixels: &PixelBuffer) -> Vec<u8> {
    let header = TensorHeader::new(pixels.height(), pixels.width(), RGB_CHANNELS as u32);
    let total = header.expected_len();
    tracing::debug!(
        height = pixels.height(),
        width = pixels.width(),
        bytes = total,
        "encoding rgb tensor"
    );

    let mut out = Vec::with_capacity(total);
    header.write_to(&mut out);
    out.resize(total, 0);
    encode_payload(pixels.as_bytes(), &mut out[HEADER_LEN..], pixels.stride());
    out
}

#[inline]
fn sample_to_f16(s: u8) -> f16 {
    f16::from_f64(f64::from(s) / 255.0 * 2.0 - 1.0)
}

fn encode_row(src: &[u8], mut dst: &mut [u8]) {
    for &s in src {
        dst.put_u16_le(sample_to_f16(s).to_bits());
    }
}

#[cfg(not(feature = "rayon"))]
fn encode_payload(src: &[u8], dst: &mut [u8], stride: usize) {
    if stride == 0 {
        return;
    }
    for (s, d) in src
        .chunks_exact(stride)
        .zip(dst.chunks_exact_mut(stride * ELEMENT_SIZE))
    {
        encode_row(s, d);
    }
}

#[cfg(feature = "rayon")]
fn encode_payload(src: &[u8], dst: &mut [u8], stride: usize) {
    use rayon::prelude::*;

    if stride == 0 {
        return;
    }
    src.par_chunks_exact(stride)
        .zip(dst.par_chunks_exact_mut(stride * ELEMENT_SIZE))
        .for_each(|(s, d)| encode_row(s, d));
}
