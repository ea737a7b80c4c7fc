use half::f16;

use crate::color::{SD_LATENT_TO_RGB, truncate_to_u8};
use crate::error::{Error, Result};
use crate::header::{HEADER_LEN, TensorHeader};
use crate::pixel::{PixelBuffer, RGB_CHANNELS};
use crate::{ELEMENT_SIZE, LATENT_CHANNELS};

/// Validated header plus the f16 payload of the first batch item.
#[derive(Debug, Clone, Copy)]
pub struct TensorPayload<'a> {
    header: TensorHeader,
    data: &'a [u8],
}

impl<'a> TensorPayload<'a> {
    pub fn header(&self) -> &TensorHeader {
        &self.header
    }

    /// Raw little-endian f16 bytes, `height * width * channels * 2` long.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.data
    }

    /// Element values in NHWC order.
    pub fn values(&self) -> impl Iterator<Item = f32> + 'a {
        self.data
            .chunks_exact(ELEMENT_SIZE)
            .map(|b| f16::from_le_bytes([b[0], b[1]]).to_f32())
    }
}

/// A tensor buffer that passed header, compression, channel and size checks.
#[derive(Debug, Clone, Copy)]
pub enum DecodedTensor<'a> {
    /// 3-channel image in `[-1, 1]`.
    Rgb(TensorPayload<'a>),
    /// 4-channel latent, previewed through [`SD_LATENT_TO_RGB`].
    Latent(TensorPayload<'a>),
}

impl<'a> DecodedTensor<'a> {
    /// Validate `buf` and classify its payload without converting it.
    pub fn parse(buf: &'a [u8]) -> Result<Self> {
        let header = TensorHeader::read(buf)?;
        if header.is_compressed() {
            return Err(Error::CompressionUnsupported {
                flag: header.compression,
            });
        }
        if header.channels != RGB_CHANNELS as u32 && header.channels != LATENT_CHANNELS as u32 {
            return Err(Error::UnsupportedChannelCount {
                channels: header.channels,
            });
        }
        let expected = header.expected_len();
        if buf.len() < expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: buf.len(),
            });
        }

        let item_len = TensorHeader { batch: 1, ..header }.payload_len();
        let payload = TensorPayload {
            header,
            data: &buf[HEADER_LEN..HEADER_LEN + item_len],
        };
        tracing::debug!(
            height = header.height,
            width = header.width,
            channels = header.channels,
            batch = header.batch,
            "parsed tensor header"
        );
        if header.channels == RGB_CHANNELS as u32 {
            Ok(Self::Rgb(payload))
        } else {
            Ok(Self::Latent(payload))
        }
    }

    pub fn payload(&self) -> &TensorPayload<'a> {
        match self {
            Self::Rgb(p) | Self::Latent(p) => p,
        }
    }

    pub fn header(&self) -> &TensorHeader {
        self.payload().header()
    }

    pub fn is_latent(&self) -> bool {
        matches!(self, Self::Latent(_))
    }

    /// Convert to RGB8. Latents are lossy previews.
    pub fn to_pixels(&self) -> PixelBuffer {
        let header = self.header();
        let mut out = PixelBuffer::zeroed(header.width, header.height);
        let (channels, convert) = match self {
            Self::Rgb(_) => (RGB_CHANNELS, rgb_row as RowFn),
            Self::Latent(_) => (LATENT_CHANNELS, latent_row as RowFn),
        };
        let src_stride = header.width as usize * channels * ELEMENT_SIZE;
        let dst_stride = out.stride();
        decode_payload(
            self.payload().as_bytes(),
            out.as_bytes_mut(),
            src_stride,
            dst_stride,
            convert,
        );
        out
    }
}

/// Decode a tensor exchange buffer to RGB8.
///
/// 3-channel payloads map `[-1, 1]` to `[0, 255]`; 4-channel payloads are
/// latents and go through [`SD_LATENT_TO_RGB`]. Fractional results are
/// truncated toward zero before clamping.
pub fn decode(buf: &[u8]) -> Result<PixelBuffer> {
    Ok(DecodedTensor::parse(buf)?.to_pixels())
}

/// Converts one row of f16 elements into RGB8 samples.
type RowFn = fn(&[u8], &mut [u8]);

#[inline]
fn read_f16(b: &[u8]) -> f32 {
    f16::from_le_bytes([b[0], b[1]]).to_f32()
}

fn rgb_row(src: &[u8], dst: &mut [u8]) {
    for (s, d) in src.chunks_exact(ELEMENT_SIZE).zip(dst.iter_mut()) {
        *d = truncate_to_u8((read_f16(s) + 1.0) * 127.5);
    }
}

fn latent_row(src: &[u8], dst: &mut [u8]) {
    for (s, d) in src
        .chunks_exact(LATENT_CHANNELS * ELEMENT_SIZE)
        .zip(dst.chunks_exact_mut(RGB_CHANNELS))
    {
        let v = [
            read_f16(&s[0..2]),
            read_f16(&s[2..4]),
            read_f16(&s[4..6]),
            read_f16(&s[6..8]),
        ];
        d.copy_from_slice(&SD_LATENT_TO_RGB.apply(v));
    }
}

#[cfg(not(feature = "rayon"))]
fn decode_payload(
    src: &[u8],
    dst: &mut [u8],
    src_stride: usize,
    dst_stride: usize,
    convert: RowFn,
) {
    if dst_stride == 0 {
        return;
    }
    for (s, d) in src
        .chunks_exact(src_stride)
        .zip(dst.chunks_exact_mut(dst_stride))
    {
        convert(s, d);
    }
}

#[cfg(feature = "rayon")]
fn decode_payload(
    src: &[u8],
    dst: &mut [u8],
    src_stride: usize,
    dst_stride: usize,
    convert: RowFn,
) {
    use rayon::prelude::*;

    if dst_stride == 0 {
        return;
    }
    src.par_chunks_exact(src_stride)
        .zip(dst.par_chunks_exact_mut(dst_stride))
        .for_each(|(s, d)| convert(s, d));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::encode;
    use crate::header::{COMPRESSION_FPZIP, write_header};

    fn tensor(height: u32, width: u32, channels: u32, values: &[f32]) -> Vec<u8> {
        let mut buf = write_header(height, width, channels).to_vec();
        for v in values {
            buf.extend_from_slice(&f16::from_f32(*v).to_le_bytes());
        }
        buf
    }

    #[test]
    fn rgb_values_map_to_full_range() {
        let buf = tensor(1, 3, 3, &[-1.0, 0.0, 1.0, 2.0, -2.0, 0.5, 0.0, 0.0, 0.0]);
        let pixels = decode(&buf).unwrap();
        // 0.0 -> 127.5 -> 127, 0.5 -> 191.25 -> 191
        assert_eq!(
            pixels.as_bytes(),
            &[0, 127, 255, 255, 0, 191, 127, 127, 127]
        );
    }

    #[test]
    fn latent_dispatch() {
        let buf = tensor(1, 1, 4, &[0.5, -0.25, 1.0, 0.0]);
        let decoded = DecodedTensor::parse(&buf).unwrap();
        assert!(decoded.is_latent());
        assert_eq!(decoded.payload().values().count(), 4);
        assert_eq!(decoded.to_pixels().pixel(0, 0), Some([93, 134, 144]));
    }

    #[test]
    fn latent_row_layout() {
        // Second pixel saturates, first sits on the bias.
        let buf = tensor(1, 2, 4, &[0.0, 0.0, 0.0, 0.0, 10.0, 0.0, 0.0, 0.0]);
        let pixels = decode(&buf).unwrap();
        assert_eq!(pixels.width(), 2);
        assert_eq!(pixels.height(), 1);
        assert_eq!(pixels.as_bytes(), &[99, 99, 99, 255, 255, 255]);
    }

    #[test]
    fn compression_checked_before_channels_and_size() {
        let mut buf = write_header(64, 64, 9).to_vec();
        buf[0..4].copy_from_slice(&COMPRESSION_FPZIP.to_le_bytes());
        assert_eq!(
            decode(&buf),
            Err(Error::CompressionUnsupported {
                flag: COMPRESSION_FPZIP
            })
        );
    }

    #[test]
    fn unknown_nonzero_flag_is_treated_as_uncompressed() {
        let mut buf = tensor(1, 1, 3, &[1.0, 1.0, 1.0]);
        buf[0..4].copy_from_slice(&7u32.to_le_bytes());
        assert_eq!(decode(&buf).unwrap().as_bytes(), &[255, 255, 255]);
    }

    #[test]
    fn channels_checked_before_size() {
        let buf = write_header(10, 10, 2);
        assert_eq!(
            decode(&buf),
            Err(Error::UnsupportedChannelCount { channels: 2 })
        );
    }

    #[test]
    fn truncated_payload() {
        let mut buf = tensor(1, 1, 3, &[0.0, 0.0, 0.0]);
        buf.pop();
        assert_eq!(
            decode(&buf),
            Err(Error::SizeMismatch {
                expected: 74,
                actual: 73
            })
        );
    }

    #[test]
    fn batch_size_counts_toward_length() {
        let mut buf = tensor(1, 1, 3, &[0.0, 0.0, 0.0]);
        buf[20..24].copy_from_slice(&2u32.to_le_bytes());
        assert_eq!(
            decode(&buf),
            Err(Error::SizeMismatch {
                expected: 80,
                actual: 74
            })
        );
        buf.extend_from_slice(&tensor(0, 0, 0, &[1.0, 1.0, 1.0])[HEADER_LEN..]);
        // Only the first item is converted.
        assert_eq!(decode(&buf).unwrap().as_bytes(), &[127, 127, 127]);
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        let mut buf = encode(&PixelBuffer::filled(1, 1, [255, 0, 255]));
        buf.extend_from_slice(&[0xEE; 5]);
        let decoded = DecodedTensor::parse(&buf).unwrap();
        assert_eq!(decoded.payload().as_bytes().len(), 6);
        assert_eq!(decoded.to_pixels().pixel(0, 0), Some([255, 0, 255]));
    }

    #[test]
    fn zero_width_decodes_to_empty() {
        let buf = write_header(4, 0, 3);
        let pixels = decode(&buf).unwrap();
        assert_eq!(pixels.height(), 4);
        assert!(pixels.as_bytes().is_empty());
    }
}
