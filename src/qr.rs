//! QR encoding and decoding for session tokens
//!
//! The partner gateway encodes a freshly issued session token into a PNG the
//! partner site can render; the mobile resolver decodes camera frames back
//! into the token text. Both directions must round-trip the token exactly.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Luma};
use qrcode::QrCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EncodingError {
    #[error(transparent)]
    Qr(#[from] qrcode::types::QrError),
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

#[derive(Debug, Error)]
pub enum DecodingError {
    #[error("no QR code was found in the frame")]
    NotFound,
    #[error(transparent)]
    Qr(#[from] rqrr::DeQRError),
}

/// Encode `text` into a QR code and render it as PNG bytes.
///
/// # Errors
///
/// Returns an error if the payload does not fit any QR code version or the
/// PNG encoder fails.
pub fn encode(text: &str) -> Result<Vec<u8>, EncodingError> {
    let code = QrCode::new(text.as_bytes())?;
    let rendered = code.render::<Luma<u8>>().build();

    let mut bytes = Vec::new();
    DynamicImage::ImageLuma8(rendered).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;

    Ok(bytes)
}

/// Decode the first QR code found in `frame` back into its text payload.
///
/// # Errors
///
/// Returns [`DecodingError::NotFound`] when the frame contains no detectable
/// QR grid, or the underlying decode error for a grid that cannot be read.
/// Continuous scanners treat either case as "keep scanning".
pub fn decode(frame: &DynamicImage) -> Result<String, DecodingError> {
    let luma = frame.to_luma8();
    let (width, height) = luma.dimensions();
    let mut prepared =
        rqrr::PreparedImage::prepare_from_greyscale(width as usize, height as usize, |x, y| {
            luma.get_pixel(x as u32, y as u32).0[0]
        });
    let grids = prepared.detect_grids();

    let grid = grids.first().ok_or(DecodingError::NotFound)?;
    let (_meta, content) = grid.decode()?;

    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token;

    fn decode_png(png: &[u8]) -> DynamicImage {
        image::load_from_memory_with_format(png, ImageFormat::Png).unwrap()
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let token = token::generate_default();
        let png = encode(&token).unwrap();
        let decoded = decode(&decode_png(&png)).unwrap();
        assert_eq!(decoded, token);
    }

    #[test]
    fn test_encode_produces_png() {
        let png = encode("vaultlink").unwrap();
        // PNG magic bytes
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_decode_blank_frame_reports_not_found() {
        let blank = DynamicImage::new_luma8(64, 64);
        assert!(matches!(decode(&blank), Err(DecodingError::NotFound)));
    }

    #[test]
    fn test_round_trip_short_payload() {
        let png = encode("T1").unwrap();
        assert_eq!(decode(&decode_png(&png)).unwrap(), "T1");
    }
}
