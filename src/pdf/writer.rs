//! PDF composition via `printpdf` 0.8
//!
//! printpdf 0.8 is data-oriented: pages are `Vec<Op>` operation lists collected
//! into `PdfPage` structs and serialised with `PdfDocument::save()`. All output
//! here targets A4.

use crate::error::{Error, Result};
use crate::pdf::reader::fit_within;
use printpdf::{
    BuiltinFont, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Point, Pt, RawImage,
    RawImageData, RawImageFormat, TextItem, XObjectTransform,
};
use std::path::{Path, PathBuf};

/// A4 canvas, in millimetres.
const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;

/// Text layout constants for synthesized PDFs, in points.
const TEXT_MARGIN: f32 = 50.0;
const FONT_SIZE: f32 = 12.0;
const LINE_LEADING: f32 = 16.0;

fn page_size() -> (Mm, Mm) {
    (Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM))
}

fn save_document(mut doc: PdfDocument, pages: Vec<PdfPage>, output: &Path) -> Result<()> {
    doc.with_pages(pages);

    let mut warnings: Vec<PdfWarnMsg> = Vec::new();
    let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
    if !warnings.is_empty() {
        tracing::debug!(count = warnings.len(), "pdf writer emitted warnings");
    }

    std::fs::write(output, &bytes)?;
    Ok(())
}

/// Compose a PDF with one page per input image, in list order.
///
/// Each image is auto-scaled to fit an A4 page and centered. Any decode
/// failure fails the whole operation; no partial document is emitted.
pub fn images_to_pdf(images: &[PathBuf], output: &Path) -> Result<()> {
    if images.is_empty() {
        return Err(Error::InvalidJob {
            reason: "images-to-pdf requires at least one input image".to_string(),
        });
    }

    let (page_w, page_h) = page_size();
    let page_w_pt = page_w.into_pt().0;
    let page_h_pt = page_h.into_pt().0;

    let mut doc = PdfDocument::new("pdf-convert");
    let mut pages: Vec<PdfPage> = Vec::new();

    for path in images {
        let decoded = image::open(path)?;
        let px_width = decoded.width();
        let px_height = decoded.height();

        let rgb = decoded.to_rgb8();
        let raw = RawImage {
            pixels: RawImageData::U8(rgb.into_raw()),
            width: px_width as usize,
            height: px_height as usize,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };
        let xobject_id = doc.add_image(&raw);

        // At 72 dpi the image's natural size in points equals its pixel count,
        // so the fit scale is target-points over pixels.
        let (fit_w, fit_h) = fit_within(px_width as f32, px_height as f32, page_w_pt, page_h_pt);
        let scale = fit_w / px_width as f32;
        let x_offset = (page_w_pt - fit_w) / 2.0;
        let y_offset = (page_h_pt - fit_h) / 2.0;

        let ops = vec![Op::UseXobject {
            id: xobject_id,
            transform: XObjectTransform {
                translate_x: Some(Pt(x_offset)),
                translate_y: Some(Pt(y_offset)),
                scale_x: Some(scale),
                scale_y: Some(scale),
                dpi: Some(72.0),
                rotate: None,
            },
        }];
        pages.push(PdfPage::new(page_w, page_h, ops));
    }

    save_document(doc, pages, output)
}

/// Synthesize a PDF from plain text, one paragraph per line, A4 pages.
///
/// No word wrapping; long lines run off the right edge the way the source
/// text had them. Empty input still produces a single blank page.
pub fn text_to_pdf(text: &str, output: &Path) -> Result<()> {
    let (page_w, page_h) = page_size();
    let page_h_pt = page_h.into_pt().0;

    let usable_height = page_h_pt - 2.0 * TEXT_MARGIN;
    let lines_per_page = (usable_height / LINE_LEADING).max(1.0) as usize;

    let lines: Vec<&str> = text.lines().collect();

    let doc = PdfDocument::new("pdf-convert");
    let mut pages: Vec<PdfPage> = Vec::new();

    for chunk in lines.chunks(lines_per_page) {
        let mut ops: Vec<Op> = Vec::new();

        for (line_idx, line) in chunk.iter().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let y = page_h_pt - TEXT_MARGIN - FONT_SIZE - (line_idx as f32 * LINE_LEADING);

            ops.push(Op::StartTextSection);
            ops.push(Op::SetTextCursor {
                pos: Point {
                    x: Pt(TEXT_MARGIN),
                    y: Pt(y),
                },
            });
            ops.push(Op::SetFontSizeBuiltinFont {
                size: Pt(FONT_SIZE),
                font: BuiltinFont::Helvetica,
            });
            ops.push(Op::WriteTextBuiltinFont {
                items: vec![TextItem::Text((*line).to_string())],
                font: BuiltinFont::Helvetica,
            });
            ops.push(Op::EndTextSection);
        }

        pages.push(PdfPage::new(page_w, page_h, ops));
    }

    if pages.is_empty() {
        pages.push(PdfPage::new(page_w, page_h, Vec::new()));
    }

    save_document(doc, pages, output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_text_to_pdf_writes_pdf_magic() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out.pdf");
        text_to_pdf("first line\nsecond line", &out).unwrap();

        let bytes = std::fs::read(&out).unwrap();
        assert_eq!(&bytes[0..4], b"%PDF");
    }

    #[test]
    fn test_empty_text_still_produces_a_document() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("blank.pdf");
        text_to_pdf("", &out).unwrap();
        assert!(out.exists());
    }

    #[test]
    fn test_images_to_pdf_rejects_empty_input() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out.pdf");
        let err = images_to_pdf(&[], &out).unwrap_err();
        assert!(matches!(err, Error::InvalidJob { .. }));
        assert!(!out.exists());
    }

    #[test]
    fn test_images_to_pdf_rejects_undecodable_input() {
        let dir = tempdir().unwrap();
        let bad = dir.path().join("not_an_image.png");
        std::fs::write(&bad, b"definitely not pixels").unwrap();

        let out = dir.path().join("out.pdf");
        assert!(images_to_pdf(&[bad], &out).is_err());
        assert!(!out.exists());
    }
}
