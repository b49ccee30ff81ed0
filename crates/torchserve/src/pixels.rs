//! Pixel payload codec for the TorchServe response body.
//!
//! The prediction endpoint replies with a JSON-encoded `[height][width][3]`
//! array of `u8` RGB intensities in row-major order. This module turns that
//! payload into an [`RgbImage`] and encodes the result as JPEG bytes for
//! storage.

use std::io::Cursor;

use image::RgbImage;

/// Errors from decoding or encoding a pixel payload.
#[derive(Debug, thiserror::Error)]
pub enum PixelError {
    /// The body was not a JSON array of byte values.
    #[error("Response is not a JSON pixel array: {0}")]
    Parse(#[from] serde_json::Error),

    /// The array had zero rows or zero columns.
    #[error("Pixel array is empty")]
    Empty,

    /// A row's width differs from the first row's width.
    #[error("Pixel row {row} has {got} columns, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        got: usize,
    },

    /// A pixel did not carry exactly three channel values.
    #[error("Pixel at row {row} has {got} channels, expected 3")]
    Channels { row: usize, got: usize },

    /// The flattened buffer did not match the claimed dimensions.
    #[error("Pixel buffer does not match {width}x{height} dimensions")]
    Buffer { width: u32, height: u32 },

    /// JPEG encoding failed.
    #[error("JPEG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Decode a TorchServe response body into an RGB raster image.
///
/// Rejects empty, ragged, and non-3-channel payloads; values outside the
/// `u8` range fail JSON deserialization and surface as [`PixelError::Parse`].
pub fn decode_pixels(body: &str) -> Result<RgbImage, PixelError> {
    let rows: Vec<Vec<Vec<u8>>> = serde_json::from_str(body)?;

    let height = rows.len();
    let width = rows.first().map(Vec::len).unwrap_or(0);
    if height == 0 || width == 0 {
        return Err(PixelError::Empty);
    }

    let mut raw = Vec::with_capacity(height * width * 3);
    for (y, row) in rows.iter().enumerate() {
        if row.len() != width {
            return Err(PixelError::Ragged {
                row: y,
                expected: width,
                got: row.len(),
            });
        }
        for pixel in row {
            if pixel.len() != 3 {
                return Err(PixelError::Channels {
                    row: y,
                    got: pixel.len(),
                });
            }
            raw.extend_from_slice(pixel);
        }
    }

    let (width, height) = (width as u32, height as u32);
    RgbImage::from_raw(width, height, raw).ok_or(PixelError::Buffer { width, height })
}

/// Encode an RGB image as JPEG bytes ready for upload.
pub fn encode_jpeg(image: &RgbImage) -> Result<Vec<u8>, PixelError> {
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, image::ImageFormat::Jpeg)?;
    Ok(bytes.into_inner())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- decoding --

    #[test]
    fn decodes_a_well_formed_array() {
        let body = "[[[255,0,0],[0,255,0],[0,0,255]],[[1,2,3],[4,5,6],[7,8,9]]]";

        let image = decode_pixels(body).unwrap();

        assert_eq!(image.width(), 3);
        assert_eq!(image.height(), 2);
        assert_eq!(image.get_pixel(0, 0).0, [255, 0, 0]);
        assert_eq!(image.get_pixel(2, 0).0, [0, 0, 255]);
        assert_eq!(image.get_pixel(1, 1).0, [4, 5, 6]);
    }

    #[test]
    fn rejects_non_json_body() {
        assert!(matches!(
            decode_pixels("model not loaded"),
            Err(PixelError::Parse(_))
        ));
    }

    #[test]
    fn rejects_values_outside_u8_range() {
        assert!(matches!(
            decode_pixels("[[[256,0,0]]]"),
            Err(PixelError::Parse(_))
        ));
    }

    #[test]
    fn rejects_empty_array() {
        assert!(matches!(decode_pixels("[]"), Err(PixelError::Empty)));
        assert!(matches!(decode_pixels("[[]]"), Err(PixelError::Empty)));
    }

    #[test]
    fn rejects_ragged_rows() {
        let body = "[[[1,2,3],[4,5,6]],[[7,8,9]]]";
        assert!(matches!(
            decode_pixels(body),
            Err(PixelError::Ragged {
                row: 1,
                expected: 2,
                got: 1
            })
        ));
    }

    #[test]
    fn rejects_wrong_channel_count() {
        let body = "[[[1,2,3,4]]]";
        assert!(matches!(
            decode_pixels(body),
            Err(PixelError::Channels { row: 0, got: 4 })
        ));
    }

    // -- encoding --

    #[test]
    fn jpeg_bytes_decode_back_to_the_same_dimensions() {
        let image = RgbImage::from_fn(8, 4, |x, y| image::Rgb([x as u8, y as u8, 128]));

        let bytes = encode_jpeg(&image).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();

        assert_eq!(decoded.width(), 8);
        assert_eq!(decoded.height(), 4);
    }
}
