//! printpdf backend for the certificate [`Canvas`].

use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, ImageTransform, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Rect,
};
use image::GenericImageView;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::document::{Canvas, FontStyle};
use crate::error::{GeneratorError, Result};
use crate::layout::{PageLayout, Rgb};

/// Resolution images are placed at before scaling into their box.
const IMAGE_DPI: f32 = 300.0;
const OUTLINE_PT: f32 = 1.0;

pub struct PdfCanvas {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
}

fn pdf_err(e: impl std::fmt::Display) -> GeneratorError {
    GeneratorError::Pdf(e.to_string())
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb(printpdf::Rgb::new(rgb.r, rgb.g, rgb.b, None))
}

impl PdfCanvas {
    pub fn new(title: &str, page: &PageLayout) -> Result<Self> {
        let (doc, page_idx, layer_idx) =
            PdfDocument::new(title, Mm(page.width_mm), Mm(page.height_mm), "certificado");
        let layer = doc.get_page(page_idx).get_layer(layer_idx);
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_err)?;
        let italic = doc.add_builtin_font(BuiltinFont::HelveticaOblique).map_err(pdf_err)?;
        Ok(Self { doc, layer, regular, bold, italic })
    }

    /// Write the single-page document to `path`, overwriting it.
    pub fn save(self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.doc.save(&mut writer).map_err(pdf_err)
    }

    fn font(&self, style: FontStyle) -> &IndirectFontRef {
        match style {
            FontStyle::Regular => &self.regular,
            FontStyle::Bold => &self.bold,
            FontStyle::Italic => &self.italic,
        }
    }

    fn rect(&self, x: f32, y: f32, w: f32, h: f32, mode: PaintMode) {
        let rect = Rect::new(Mm(x), Mm(y), Mm(x + w), Mm(y + h)).with_mode(mode);
        self.layer.add_rect(rect);
    }
}

impl Canvas for PdfCanvas {
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, rgb: Rgb) {
        self.layer.set_fill_color(color(rgb));
        self.rect(x, y, w, h, PaintMode::Fill);
    }

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, rgb: Rgb) {
        self.layer.set_outline_color(color(rgb));
        self.layer.set_outline_thickness(OUTLINE_PT);
        self.rect(x, y, w, h, PaintMode::Stroke);
    }

    fn text(&mut self, text: &str, style: FontStyle, size: f32, x: f32, y: f32, rgb: Rgb) {
        self.layer.set_fill_color(color(rgb));
        self.layer.use_text(text, size, Mm(x), Mm(y), self.font(style));
    }

    fn image(&mut self, path: &Path, x: f32, y: f32, w: f32, h: f32) -> Result<()> {
        // Decoded as-is so RGBA sources keep their alpha as a soft mask.
        let decoded = image::open(path)?;
        let (px_w, px_h) = decoded.dimensions();

        let native_w = px_w as f32 / IMAGE_DPI * 25.4;
        let native_h = px_h as f32 / IMAGE_DPI * 25.4;
        let scale = (w / native_w).min(h / native_h);
        let offset_x = (w - native_w * scale) / 2.0;
        let offset_y = (h - native_h * scale) / 2.0;

        let img = printpdf::Image::from_dynamic_image(&decoded);
        img.add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(x + offset_x)),
                translate_y: Some(Mm(y + offset_y)),
                scale_x: Some(scale),
                scale_y: Some(scale),
                dpi: Some(IMAGE_DPI),
                ..Default::default()
            },
        );
        Ok(())
    }
}
