//! Document Renderer - one-page sealed account certificate
//!
//! Layout is expressed against the [`Canvas`] seam so the same routine drives
//! the PDF backend and in-memory recorders. Both single and batch generation
//! go through [`render_document`].

use std::path::Path;

use crate::account::AccountRecord;
use crate::error::Result;
use crate::layout::{PageLayout, Rgb};
use crate::metrics::text_width_mm;
use crate::pdf::PdfCanvas;

pub const TITLE: &str = "BANTU — Registro de Conta";
pub const SUBTITLE: &str = "Banco da Nova Terra Universal • Documento Selado";
pub const FOOTER: &str =
    "Obra SAIH GENESS — BANTU • Registro de Conta • Para a Glória do Altíssimo";
pub const QR_CAPTION: &str = "QR Code (endereço EVM):";
pub const PENDING_SIGNATURE: &str = "Assinatura pendente (insira imagem para selar).";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
    Italic,
}

/// Drawing primitives the certificate needs. Units are millimetres, origin
/// bottom-left; font sizes are points.
pub trait Canvas {
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb);
    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb);
    fn text(&mut self, text: &str, style: FontStyle, size: f32, x: f32, y: f32, color: Rgb);
    /// Fit the raster at `path` inside the box, keeping its aspect ratio.
    fn image(&mut self, path: &Path, x: f32, y: f32, w: f32, h: f32) -> Result<()>;
}

fn centered_text<C: Canvas>(canvas: &mut C, text: &str, style: FontStyle, size: f32, cx: f32, y: f32, color: Rgb) {
    let x = cx - text_width_mm(text, style, size) / 2.0;
    canvas.text(text, style, size, x, y, color);
}

/// Keep at most `max` characters of a notes line.
fn truncate_chars(line: &str, max: usize) -> &str {
    match line.char_indices().nth(max) {
        Some((idx, _)) => &line[..idx],
        None => line,
    }
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0b}' | '\u{0c}' | '\u{1c}' | '\u{1d}' | '\u{1e}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Split notes into printed lines. `\r\n` counts as one break and a trailing
/// break does not open an empty line.
fn note_lines(notes: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = notes;
    while !rest.is_empty() {
        let Some(idx) = rest.find(is_line_break) else {
            lines.push(rest);
            break;
        };
        lines.push(&rest[..idx]);
        let tail = &rest[idx..];
        let skip = if tail.starts_with("\r\n") {
            2
        } else {
            tail.chars().next().map_or(1, char::len_utf8)
        };
        rest = &tail[skip..];
    }
    lines
}

/// Lay out the certificate for `record` on `canvas`.
///
/// The QR block is drawn only if `qr_path` exists. The signature image is
/// embedded only if `signature` is given and exists; otherwise an empty
/// bordered box with a pending caption is drawn.
pub fn layout_certificate<C: Canvas>(
    canvas: &mut C,
    page: &PageLayout,
    record: &AccountRecord,
    qr_path: &Path,
    signature: Option<&Path>,
) -> Result<()> {
    let left = page.margin_mm;
    let top = page.height_mm;
    let cx = page.center_x();

    // Header band
    canvas.fill_rect(0.0, top - page.header_height_mm, page.width_mm, page.header_height_mm, page.header_fill);
    centered_text(canvas, TITLE, FontStyle::Bold, 18.0, cx, top - 20.0, Rgb::WHITE);
    centered_text(canvas, SUBTITLE, FontStyle::Regular, 10.0, cx, top - 29.0, Rgb::WHITE);
    let generated = record.data_registro.format("Gerado em %Y-%m-%d %H:%M UTC").to_string();
    centered_text(canvas, &generated, FontStyle::Regular, 10.0, cx, top - 34.0, Rgb::WHITE);

    // Key/value block
    let mut y = page.body_top();
    let registered = record.registered_at();
    let fields: [(&str, &str); 7] = [
        ("ID da Conta", &record.id_conta),
        ("Nome", &record.nome),
        ("Tipo", record.tipo_conta.as_str()),
        ("Endereço EVM", &record.endereco_evm),
        ("SHA-256 (endereço)", &record.hash_sha256),
        ("Status", record.status.as_str()),
        ("Data de Registro", &registered),
    ];
    for (label, value) in fields {
        canvas.text(&format!("{label}:"), FontStyle::Bold, 11.0, left, y, Rgb::BLACK);
        canvas.text(value, FontStyle::Regular, 11.0, page.value_x(), y, Rgb::BLACK);
        y -= page.line_pitch_mm;
    }

    if qr_path.exists() {
        canvas.text(QR_CAPTION, FontStyle::Bold, 11.0, left, y - 2.0, Rgb::BLACK);
        let size = page.qr_size_mm;
        canvas.image(qr_path, left, y - 5.0 - size, size, size)?;
    }
    y -= page.qr_block_mm;

    // Notes
    canvas.text("Observações:", FontStyle::Bold, 11.0, left, y, Rgb::BLACK);
    y -= page.line_pitch_mm;
    for line in note_lines(&record.observacoes) {
        canvas.text(truncate_chars(line, page.notes_max_chars), FontStyle::Regular, 10.0, left, y, Rgb::BLACK);
        y -= page.notes_pitch_mm;
    }

    // Signature block
    let y = y.max(page.signature_floor_mm);
    let [sig_w, sig_h] = page.signature_box_mm;
    canvas.text("Assinatura:", FontStyle::Bold, 11.0, left, y + 25.0, Rgb::BLACK);
    match signature.filter(|p| p.exists()) {
        Some(sig) => {
            canvas.image(sig, left, y, sig_w, sig_h)?;
            let name = sig
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            canvas.text(&format!("Assinatura inserida: {name}"), FontStyle::Regular, 9.0, left, y - 5.0, page.caption_color);
        }
        None => {
            if let Some(missing) = signature {
                tracing::warn!(path = %missing.display(), "signature image not found, leaving certificate unsigned");
            }
            canvas.stroke_rect(left, y, sig_w, sig_h, Rgb::BLACK);
            canvas.text(PENDING_SIGNATURE, FontStyle::Regular, 9.0, left + 2.0, y + sig_h / 2.0 - 3.0, page.caption_color);
        }
    }

    centered_text(canvas, FOOTER, FontStyle::Italic, 9.0, cx, page.footer_y_mm, page.footer_color);
    Ok(())
}

/// Render the certificate PDF for `record` to `out`, overwriting it.
pub fn render_document(
    record: &AccountRecord,
    qr_path: &Path,
    signature: Option<&Path>,
    page: &PageLayout,
    out: &Path,
) -> Result<()> {
    let mut canvas = PdfCanvas::new(&format!("BANTU {}", record.id_conta), page)?;
    layout_certificate(&mut canvas, page, record, qr_path, signature)?;
    canvas.save(out)?;
    tracing::debug!(path = %out.display(), "certificate PDF written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::{AccountStatus, AccountType, OutputLayout};
    use crate::record::{build_record, AccountFields};
    use chrono::Utc;
    use std::path::PathBuf;

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Fill,
        Stroke,
        Text { text: String, x: f32, y: f32 },
        Image { path: PathBuf, y: f32, w: f32, h: f32 },
    }

    #[derive(Default)]
    struct Recorder {
        ops: Vec<Op>,
    }

    impl Recorder {
        fn texts(&self) -> Vec<&str> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    Op::Text { text, .. } => Some(text.as_str()),
                    _ => None,
                })
                .collect()
        }

        fn images(&self) -> Vec<&Op> {
            self.ops.iter().filter(|op| matches!(op, Op::Image { .. })).collect()
        }
    }

    impl Canvas for Recorder {
        fn fill_rect(&mut self, _x: f32, _y: f32, _w: f32, _h: f32, _color: Rgb) {
            self.ops.push(Op::Fill);
        }
        fn stroke_rect(&mut self, _x: f32, _y: f32, _w: f32, _h: f32, _color: Rgb) {
            self.ops.push(Op::Stroke);
        }
        fn text(&mut self, text: &str, _style: FontStyle, _size: f32, x: f32, y: f32, _color: Rgb) {
            self.ops.push(Op::Text { text: text.to_string(), x, y });
        }
        fn image(&mut self, path: &Path, _x: f32, y: f32, w: f32, h: f32) -> Result<()> {
            self.ops.push(Op::Image { path: path.to_path_buf(), y, w, h });
            Ok(())
        }
    }

    fn record(notes: Option<&str>) -> AccountRecord {
        let fields = AccountFields {
            id: "BANTU-0007".to_string(),
            name: "Maria Sá".to_string(),
            account_type: AccountType::Levite,
            address: "0x00000000000000000000000000000000000000ff".to_string(),
            status: AccountStatus::Private,
            notes: notes.map(str::to_string),
        };
        build_record(&fields, &OutputLayout::new("out"), Utc::now())
    }

    #[test]
    fn test_key_value_block_in_order() {
        let rec = record(None);
        let mut canvas = Recorder::default();
        layout_certificate(&mut canvas, &PageLayout::default(), &rec, Path::new("/nonexistent.png"), None).unwrap();

        let texts = canvas.texts();
        let labels: Vec<_> = texts.iter().filter(|t| t.ends_with(':')).copied().collect();
        assert_eq!(
            &labels[..7],
            ["ID da Conta:", "Nome:", "Tipo:", "Endereço EVM:", "SHA-256 (endereço):", "Status:", "Data de Registro:"]
        );
        assert!(texts.contains(&"BANTU-0007"));
        assert!(texts.contains(&"levita"));
        assert!(texts.contains(&"privado"));
        assert!(texts.contains(&rec.hash_sha256.as_str()));
        assert!(texts.contains(&FOOTER));
        assert!(texts.contains(&TITLE));
    }

    #[test]
    fn test_missing_qr_is_silently_omitted() {
        let rec = record(None);
        let mut canvas = Recorder::default();
        layout_certificate(&mut canvas, &PageLayout::default(), &rec, Path::new("/nonexistent.png"), None).unwrap();

        assert!(canvas.images().is_empty());
        assert!(!canvas.texts().contains(&QR_CAPTION));
    }

    #[test]
    fn test_qr_embedded_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let qr = dir.path().join("qr.png");
        std::fs::write(&qr, b"png").unwrap();

        let rec = record(None);
        let page = PageLayout::default();
        let mut canvas = Recorder::default();
        layout_certificate(&mut canvas, &page, &rec, &qr, None).unwrap();

        assert!(canvas.texts().contains(&QR_CAPTION));
        let images = canvas.images();
        assert_eq!(images.len(), 1);
        assert_eq!(
            images[0],
            &Op::Image { path: qr, y: page.body_top() - 7.0 * page.line_pitch_mm - 45.0, w: 40.0, h: 40.0 }
        );
    }

    #[test]
    fn test_unsigned_draws_pending_box() {
        let rec = record(None);
        let mut canvas = Recorder::default();
        layout_certificate(&mut canvas, &PageLayout::default(), &rec, Path::new("/nonexistent.png"), Some(Path::new("/missing/sig.png"))).unwrap();

        assert!(canvas.ops.contains(&Op::Stroke));
        assert!(canvas.texts().contains(&PENDING_SIGNATURE));
        assert!(canvas.images().is_empty());
    }

    #[test]
    fn test_signed_embeds_image_with_caption() {
        let dir = tempfile::tempdir().unwrap();
        let sig = dir.path().join("assinatura.png");
        std::fs::write(&sig, b"png").unwrap();

        let rec = record(None);
        let mut canvas = Recorder::default();
        layout_certificate(&mut canvas, &PageLayout::default(), &rec, Path::new("/nonexistent.png"), Some(&sig)).unwrap();

        assert!(!canvas.ops.contains(&Op::Stroke));
        assert!(canvas.texts().contains(&"Assinatura inserida: assinatura.png"));
        assert!(!canvas.texts().contains(&PENDING_SIGNATURE));
    }

    #[test]
    fn test_notes_split_on_newlines_and_truncated() {
        let long = "x".repeat(150);
        let rec = record(Some(&format!("primeira linha\n{long}\nterceira")));
        let page = PageLayout::default();
        let mut canvas = Recorder::default();
        layout_certificate(&mut canvas, &page, &rec, Path::new("/nonexistent.png"), None).unwrap();

        let texts = canvas.texts();
        let heading = texts.iter().position(|t| *t == "Observações:").unwrap();
        assert_eq!(texts[heading + 1], "primeira linha");
        assert_eq!(texts[heading + 2].chars().count(), page.notes_max_chars);
        assert_eq!(texts[heading + 3], "terceira");
    }

    #[test]
    fn test_note_lines_break_on_every_line_separator() {
        assert_eq!(note_lines("um\rdois\r\ntrês\u{2028}quatro\x0ccinco"), ["um", "dois", "três", "quatro", "cinco"]);
        assert_eq!(note_lines("a\n\nb\n"), ["a", "", "b"]);
        assert!(note_lines("").is_empty());
    }

    #[test]
    fn test_lone_carriage_return_splits_printed_notes() {
        let rec = record(Some("linha um\rlinha dois"));
        let mut canvas = Recorder::default();
        layout_certificate(&mut canvas, &PageLayout::default(), &rec, Path::new("/nonexistent.png"), None).unwrap();

        let texts = canvas.texts();
        let heading = texts.iter().position(|t| *t == "Observações:").unwrap();
        assert_eq!(texts[heading + 1], "linha um");
        assert_eq!(texts[heading + 2], "linha dois");
    }

    #[test]
    fn test_title_is_centred_on_page() {
        let rec = record(None);
        let page = PageLayout::default();
        let mut canvas = Recorder::default();
        layout_certificate(&mut canvas, &page, &rec, Path::new("/nonexistent.png"), None).unwrap();

        let x = canvas
            .ops
            .iter()
            .find_map(|op| match op {
                Op::Text { text, x, .. } if text == TITLE => Some(*x),
                _ => None,
            })
            .unwrap();
        let width = text_width_mm(TITLE, FontStyle::Bold, 18.0);
        assert!((x + width / 2.0 - page.center_x()).abs() < 1e-3);
    }

    #[test]
    fn test_signature_block_never_below_floor() {
        let many_lines = vec!["linha"; 60].join("\n");
        let rec = record(Some(&many_lines));
        let page = PageLayout::default();
        let mut canvas = Recorder::default();
        layout_certificate(&mut canvas, &page, &rec, Path::new("/nonexistent.png"), None).unwrap();

        let heading_y = canvas
            .ops
            .iter()
            .find_map(|op| match op {
                Op::Text { text, y, .. } if text == "Assinatura:" => Some(*y),
                _ => None,
            })
            .unwrap();
        assert_eq!(heading_y, page.signature_floor_mm + 25.0);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("ãããã", 2), "ãã");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }

    #[test]
    fn test_render_pdf_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("cert.pdf");
        let rec = record(None);
        render_document(&rec, Path::new("/nonexistent.png"), None, &PageLayout::default(), &out).unwrap();

        let bytes = std::fs::read(&out).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
