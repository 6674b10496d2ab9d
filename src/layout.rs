//! Certificate page geometry
//!
//! All coordinates are millimetres with the origin at the bottom-left corner
//! of the page, the same convention the PDF backend uses.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn gray(hex: u8) -> Self {
        let v = f32::from(hex) / 255.0;
        Self { r: v, g: v, b: v }
    }

    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);
}

/// Fixed template for the sealed account certificate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageLayout {
    pub width_mm: f32,
    pub height_mm: f32,
    pub margin_mm: f32,
    pub header_height_mm: f32,
    pub header_fill: Rgb,
    /// Offset of the value column from the left margin.
    pub label_width_mm: f32,
    pub line_pitch_mm: f32,
    pub qr_size_mm: f32,
    /// Vertical space the QR block takes, drawn or not.
    pub qr_block_mm: f32,
    pub notes_pitch_mm: f32,
    pub notes_max_chars: usize,
    /// Lowest baseline the signature block may sit on.
    pub signature_floor_mm: f32,
    pub signature_box_mm: [f32; 2],
    pub caption_color: Rgb,
    pub footer_color: Rgb,
    pub footer_y_mm: f32,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            width_mm: 210.0,
            height_mm: 297.0,
            margin_mm: 20.0,
            header_height_mm: 40.0,
            header_fill: Rgb::new(0.05, 0.09, 0.16),
            label_width_mm: 45.0,
            line_pitch_mm: 6.0,
            qr_size_mm: 40.0,
            qr_block_mm: 50.0,
            notes_pitch_mm: 5.0,
            notes_max_chars: 110,
            signature_floor_mm: 50.0,
            signature_box_mm: [70.0, 20.0],
            caption_color: Rgb::gray(0x55),
            footer_color: Rgb::gray(0x66),
            footer_y_mm: 10.0,
        }
    }
}

impl PageLayout {
    pub fn center_x(&self) -> f32 {
        self.width_mm / 2.0
    }

    pub fn value_x(&self) -> f32 {
        self.margin_mm + self.label_width_mm
    }

    /// Baseline of the first key/value line, 10 mm under the header band.
    pub fn body_top(&self) -> f32 {
        self.height_mm - self.header_height_mm - 10.0
    }
}
