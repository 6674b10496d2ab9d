//! QR Renderer Adapter
//!
//! Wraps the `qrcode` symbol encoder and rasterizes the module grid into a
//! square grayscale bitmap of the requested size.

use image::{GrayImage, ImageFormat, Luma};
use qrcode::{Color, QrCode};
use std::path::Path;

use crate::error::{GeneratorError, Result};

/// Bitmap edge used for every generated QR code.
pub const QR_SIZE_PX: u32 = 512;

/// Light modules surrounding the symbol on each side.
pub const QUIET_ZONE_MODULES: usize = 4;

const DARK: Luma<u8> = Luma([0]);
const LIGHT: Luma<u8> = Luma([255]);

/// Encode `text` as a QR symbol scaled uniformly into a `size_px` square.
///
/// Scale factor is `size_px / native_width`, where the native width counts
/// the quiet zone. Fails when the payload exceeds QR capacity.
pub fn render_qr(text: &str, size_px: u32) -> Result<GrayImage> {
    let code = QrCode::new(text.as_bytes()).map_err(|e| GeneratorError::Qr(e.to_string()))?;
    let modules = code.width();
    let colors = code.to_colors();

    let native = (modules + 2 * QUIET_ZONE_MODULES) as f64;
    let scale = f64::from(size_px) / native;

    let mut img = GrayImage::from_pixel(size_px, size_px, LIGHT);
    for (px, py, pixel) in img.enumerate_pixels_mut() {
        let mx = (f64::from(px) / scale).floor() as usize;
        let my = (f64::from(py) / scale).floor() as usize;
        if module_is_dark(&colors, modules, mx, my) {
            *pixel = DARK;
        }
    }
    Ok(img)
}

/// Render and write the QR bitmap as PNG, overwriting `path`.
pub fn write_qr_png(text: &str, path: &Path, size_px: u32) -> Result<()> {
    let img = render_qr(text, size_px)?;
    img.save_with_format(path, ImageFormat::Png)?;
    tracing::debug!(path = %path.display(), size_px, "QR code written");
    Ok(())
}

/// Module lookup in quiet-zone-padded coordinates.
fn module_is_dark(colors: &[Color], modules: usize, mx: usize, my: usize) -> bool {
    let (Some(x), Some(y)) = (
        mx.checked_sub(QUIET_ZONE_MODULES),
        my.checked_sub(QUIET_ZONE_MODULES),
    ) else {
        return false;
    };
    x < modules && y < modules && colors[y * modules + x] == Color::Dark
}
