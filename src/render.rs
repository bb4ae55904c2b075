//! Rasterising QR symbols.

use image::{GrayImage, ImageBuffer, Luma};
use tracing::trace;

use crate::error::Result;
use crate::qrcode::{QrCode, QrCodeEcc};

/// Fixed encoding and sizing parameters for label codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QrStyle {
    pub ecc: QrCodeEcc,
    /// Pixels per module.
    pub box_size: u32,
    /// Quiet zone width in modules.
    pub border: u32,
}

impl Default for QrStyle {
    fn default() -> Self {
        Self {
            ecc: QrCodeEcc::Low,
            box_size: 10,
            border: 4,
        }
    }
}

/// Renders a QR Code as black modules on a white background.
///
/// The image is `(size + 2 * border) * box_size` pixels square.
pub fn to_image(qr: &QrCode, style: &QrStyle) -> GrayImage {
    let border = style.border as i32;
    let scale = style.box_size.max(1);
    let side = (qr.size() as u32 + 2 * style.border) * scale;
    let mut img = ImageBuffer::new(side, side);

    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let qr_x = (x / scale) as i32 - border;
        let qr_y = (y / scale) as i32 - border;
        *pixel = if qr.get_module(qr_x, qr_y) {
            Luma([0u8]) // Black
        } else {
            Luma([255u8]) // White
        };
    }

    img
}

/// Renders a QR Code as text, two characters per module.
pub fn to_ascii(qr: &QrCode, border: i32) -> String {
    let mut out = String::new();
    for y in -border..qr.size() + border {
        for x in -border..qr.size() + border {
            let c: char = if qr.get_module(x, y) { '█' } else { ' ' };
            out.push(c);
            out.push(c);
        }
        out.push('\n');
    }
    out
}

/// Encodes `content` and renders it with the given style.
///
/// # Errors
///
/// Returns [`crate::Error::Encode`] when the content does not fit in a version 40 symbol.
///
/// # Example
///
/// ```
/// use qilabel::render::{generate_image, QrStyle};
///
/// let img = generate_image("Hello, World!", &QrStyle::default()).unwrap();
/// assert_eq!(img.dimensions(), (290, 290));
/// ```
pub fn generate_image(content: &str, style: &QrStyle) -> Result<GrayImage> {
    let qr: QrCode = QrCode::encode_text(content, style.ecc)?;
    trace!(version = qr.version().value(), mask = qr.mask().value(), "encoded symbol\n{}", to_ascii(&qr, 1));
    Ok(to_image(&qr, style))
}

// Tests
#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_generate_image_buffer() {
        let style = QrStyle { box_size: 1, ..QrStyle::default() };
        let img = generate_image("Hello, world!", &style).unwrap();

        // Version 1 at low error correction with a border of 4 is 29x29 modules.
        assert_eq!(img.dimensions(), (29, 29));
    }

    #[test]
    fn test_quiet_zone_is_white() {
        let img = generate_image("Hello, world!", &QrStyle::default()).unwrap();
        assert_eq!(img.get_pixel(0, 0)[0], 255);
        assert_eq!(img.get_pixel(39, 39)[0], 255);
        // First finder module starts after 4 modules of 10 pixels
        assert_eq!(img.get_pixel(40, 40)[0], 0);
        assert_eq!(img.get_pixel(49, 49)[0], 0);
    }

    #[test]
    fn test_to_ascii_dimensions() {
        let qr = QrCode::encode_text("HELLO", QrCodeEcc::Low).unwrap();
        let text = to_ascii(&qr, 2);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 25);
        assert_eq!(lines[0].chars().count(), 50);
    }

    #[test]
    fn test_oversized_payload_is_error() {
        let huge = "z".repeat(4000);
        let err = generate_image(&huge, &QrStyle::default()).unwrap_err();
        assert!(matches!(err, Error::Encode(_)));
    }
}
