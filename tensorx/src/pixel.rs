use crate::error::{Error, Result};

/// Samples per pixel in a [`PixelBuffer`].
pub const RGB_CHANNELS: usize = 3;

/// Owned RGB8 image, rows top to bottom, stride `width * 3`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap interleaved RGB bytes. `data` must be exactly `width * height * 3` long.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(RGB_CHANNELS));
        if expected != Some(data.len()) {
            return Err(Error::InvalidPixelBuffer {
                width,
                height,
                len: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Buffer filled with a single color.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let count = width as usize * height as usize;
        let mut data = Vec::with_capacity(count * RGB_CHANNELS);
        for _ in 0..count {
            data.extend_from_slice(&rgb);
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub(crate) fn zeroed(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; width as usize * height as usize * RGB_CHANNELS],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.width as usize * RGB_CHANNELS
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Bytes of row `y`, or `None` past the last row.
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let stride = self.stride();
        let start = y as usize * stride;
        self.data.get(start..start + stride)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width {
            return None;
        }
        let row = self.row(y)?;
        let at = x as usize * RGB_CHANNELS;
        Some([row[at], row[at + 1], row[at + 2]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_length() {
        let err = PixelBuffer::new(2, 2, vec![0; 11]).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidPixelBuffer {
                width: 2,
                height: 2,
                len: 11
            }
        );
    }

    #[test]
    fn empty_buffer_is_valid() {
        let buf = PixelBuffer::new(0, 5, Vec::new()).unwrap();
        assert_eq!(buf.stride(), 0);
        assert!(buf.row(0).is_some());
        assert_eq!(buf.pixel(0, 0), None);
    }

    #[test]
    fn pixel_addressing_is_row_major() {
        let data: Vec<u8> = (0..18).collect();
        let buf = PixelBuffer::new(3, 2, data).unwrap();
        assert_eq!(buf.row(1).unwrap(), &[9, 10, 11, 12, 13, 14, 15, 16, 17]);
        assert_eq!(buf.pixel(2, 0), Some([6, 7, 8]));
        assert_eq!(buf.pixel(1, 1), Some([12, 13, 14]));
        assert_eq!(buf.pixel(3, 0), None);
        assert_eq!(buf.row(2), None);
    }

    #[test]
    fn filled_repeats_color() {
        let buf = PixelBuffer::filled(2, 1, [1, 2, 3]);
        assert_eq!(buf.as_bytes(), &[1, 2, 3, 1, 2, 3]);
    }
}
