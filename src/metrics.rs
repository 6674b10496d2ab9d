//! Helvetica advance widths
//!
//! Widths come from the Adobe core font metrics, in 1/1000 em, for the
//! printable ASCII range. Other characters are measured through their closest
//! ASCII transliteration, so `ã` measures as `a`.

use crate::document::FontStyle;

const PT_TO_MM: f32 = 25.4 / 72.0;
const FALLBACK_WIDTH: u16 = 556;

/// Helvetica (and Helvetica-Oblique), code points 0x20..=0x7E.
#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica-Bold, code points 0x20..=0x7E.
#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

fn table(style: FontStyle) -> &'static [u16; 95] {
    match style {
        FontStyle::Bold => &HELVETICA_BOLD,
        FontStyle::Regular | FontStyle::Italic => &HELVETICA,
    }
}

fn ascii_width(widths: &[u16; 95], c: char) -> u16 {
    match c {
        ' '..='~' => widths[c as usize - 0x20],
        _ => FALLBACK_WIDTH,
    }
}

fn char_width(widths: &[u16; 95], c: char) -> u32 {
    match c {
        ' '..='~' => u32::from(ascii_width(widths, c)),
        '—' => 1000,
        '•' => 350,
        _ => match deunicode::deunicode_char(c) {
            Some(ascii) if !ascii.is_empty() => ascii.chars().map(|a| u32::from(ascii_width(widths, a))).sum(),
            _ => u32::from(FALLBACK_WIDTH),
        },
    }
}

/// Advance width of `text` set in `style` at `size` points, in millimetres.
pub fn text_width_mm(text: &str, style: FontStyle, size: f32) -> f32 {
    let widths = table(style);
    let units: u32 = text.chars().map(|c| char_width(widths, c)).sum();
    units as f32 / 1000.0 * size * PT_TO_MM
}
