//! PNG encoding and decoding of QR symbols.
//!
//! Symbol construction is delegated to `qrcode`, detection and decoding to
//! `rqrr`. This module only rasterises the module grid into a square
//! greyscale PNG and back.

use std::io::Cursor;
use std::panic::{self, AssertUnwindSafe};

use image::{GrayImage, ImageFormat, Luma};
use qrcode::{Color, QrCode};

/// Default edge length of generated QR images, in pixels.
pub const DEFAULT_QR_SIZE: u32 = 300;

/// Largest accepted image edge, in pixels.
pub const MAX_QR_SIZE: u32 = 4096;

/// Light modules kept around the symbol so scanners can find it.
const QUIET_ZONE_MODULES: u32 = 4;

/// Smallest module size, in pixels, that still decodes reliably.
const MIN_MODULE_SCALE: u32 = 2;

const DARK: Luma<u8> = Luma([0]);
const LIGHT: Luma<u8> = Luma([255]);

#[derive(Debug, thiserror::Error)]
pub enum QrCodecError {
    #[error("Text cannot be encoded as a QR code: {0}")]
    Encode(String),

    #[error("QR symbol needs at least {required}px but the image is {size}px")]
    TooLarge { required: u32, size: u32 },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("No QR code found in image")]
    NoSymbol,

    #[error("QR code could not be decoded: {0}")]
    Decode(String),
}

/// Encode `text` as a QR symbol rendered into a `size` x `size` PNG.
///
/// Each module is drawn as a whole number of pixels (at least two) and the
/// symbol is centred, so any leftover pixels widen the quiet zone. Text
/// whose symbol would need more room than `size` allows is rejected.
pub fn encode_png(text: &str, size: u32) -> Result<Vec<u8>, QrCodecError> {
    let code =
        QrCode::new(text.as_bytes()).map_err(|e| QrCodecError::Encode(format!("{e:?}")))?;

    let span = code.width() as u32 + 2 * QUIET_ZONE_MODULES;
    let scale = size / span;
    if scale < MIN_MODULE_SCALE {
        return Err(QrCodecError::TooLarge {
            required: span * MIN_MODULE_SCALE,
            size,
        });
    }

    let mut png = Vec::new();
    render(&code, size, scale).write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}

/// Draw `code` centred in a `size` x `size` image, `scale` pixels per module.
fn render(code: &QrCode, size: u32, scale: u32) -> GrayImage {
    let modules = code.width() as u32;
    let colors = code.to_colors();
    let offset = size.saturating_sub(modules * scale) / 2;

    GrayImage::from_fn(size, size, |x, y| {
        if x < offset || y < offset {
            return LIGHT;
        }
        let (col, row) = ((x - offset) / scale, (y - offset) / scale);
        if col < modules && row < modules && colors[(row * modules + col) as usize] == Color::Dark
        {
            DARK
        } else {
            LIGHT
        }
    })
}

/// Decode the first QR symbol found in an image and return its text.
///
/// The image comes from outside, and `rqrr` asserts on some degenerate
/// inputs (modules a single pixel wide, for one). Such a panic is reported
/// as [`QrCodecError::Decode`].
pub fn decode_png(bytes: &[u8]) -> Result<String, QrCodecError> {
    let image = image::load_from_memory(bytes)?.to_luma8();

    panic::catch_unwind(AssertUnwindSafe(|| detect_and_decode(&image))).unwrap_or_else(|_| {
        Err(QrCodecError::Decode(
            "QR detector rejected the image".to_string(),
        ))
    })
}

fn detect_and_decode(image: &GrayImage) -> Result<String, QrCodecError> {
    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
        image.width() as usize,
        image.height() as usize,
        |x, y| image.get_pixel(x as u32, y as u32).0[0],
    );
    let grids = prepared.detect_grids();
    let grid = grids.first().ok_or(QrCodecError::NoSymbol)?;

    let (_meta, content) = grid
        .decode()
        .map_err(|e| QrCodecError::Decode(format!("{e:?}")))?;
    Ok(content)
}
