//! Integration tests for the conversion engine
//!
//! PDF fixtures are synthesized at test time through the engine's own
//! text/image composition paths, so every test starts from a known document.

use pdf_convert::office::engine::{
    DocumentEngine, EngineFactory, EngineFamily, ExportFormat, SlideDeck, Workbook,
};
use pdf_convert::office::ooxml::{PptxDeck, XlsxWorkbook};
use pdf_convert::{
    pdf, ConversionJob, Dispatcher, Error, Operation, Result, EMPTY_FALLBACK_TEXT,
};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn make_text_pdf(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    pdf::text_to_pdf(text, &path).expect("failed to synthesize fixture PDF");
    path
}

fn make_image(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    image::RgbaImage::from_pixel(width, height, image::Rgba([40, 90, 200, 255]))
        .save(&path)
        .expect("failed to write fixture image");
    path
}

/// A structurally valid PDF with zero pages, byte-exact xref included.
fn make_zero_page_pdf(dir: &Path) -> PathBuf {
    let mut out: Vec<u8> = Vec::new();
    let mut offsets = Vec::new();
    out.extend_from_slice(b"%PDF-1.4\n");
    let objects = [
        "1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n",
        "2 0 obj\n<< /Type /Pages /Kids [] /Count 0 >>\nendobj\n",
    ];
    for obj in objects {
        offsets.push(out.len());
        out.extend_from_slice(obj.as_bytes());
    }
    let xref_pos = out.len();
    out.extend_from_slice(b"xref\n0 3\n0000000000 65535 f \n");
    for offset in offsets {
        out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    out.extend_from_slice(b"trailer\n<< /Size 3 /Root 1 0 R >>\nstartxref\n");
    out.extend_from_slice(format!("{}\n%%EOF\n", xref_pos).as_bytes());

    let path = dir.join("zero-page.pdf");
    std::fs::write(&path, out).unwrap();
    path
}

fn read_zip_part(path: &Path, name: &str) -> String {
    let file = std::fs::File::open(path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    let mut part = archive.by_name(name).unwrap();
    let mut content = String::new();
    part.read_to_string(&mut content).unwrap();
    content
}

/// Engine factory whose document engines always fail at launch. Compose
/// facades stay real, so fallback and compose paths run end to end.
struct EnginelessFactory;

struct NoEngine;

impl DocumentEngine for NoEngine {
    fn launch(&mut self) -> Result<()> {
        Err(Error::EngineUnavailable {
            reason: "no office engine in test environment".to_string(),
        })
    }

    fn open(&mut self, _input: &Path) -> Result<()> {
        unreachable!("launch always fails")
    }

    fn export(&mut self, _output: &Path, _format: ExportFormat) -> Result<()> {
        unreachable!("launch always fails")
    }

    fn close(&mut self) {}
    fn quit(&mut self) {}
}

impl EngineFactory for EnginelessFactory {
    fn document_engine(&self, _family: EngineFamily) -> Box<dyn DocumentEngine> {
        Box::new(NoEngine)
    }

    fn slide_deck(&self) -> Box<dyn SlideDeck> {
        Box::new(PptxDeck::new())
    }

    fn workbook(&self) -> Box<dyn Workbook> {
        Box::new(XlsxWorkbook::new())
    }
}

fn engineless_dispatcher() -> Dispatcher {
    Dispatcher::with_factory(Arc::new(EnginelessFactory))
}

// ============================================================================
// Structural operations
// ============================================================================

#[test]
fn test_merge_page_counts_and_order() {
    let dir = tempfile::tempdir().unwrap();
    let a = make_text_pdf(dir.path(), "a.pdf", "alpha document");
    let b = make_text_pdf(dir.path(), "b.pdf", "bravo document");
    let c = make_text_pdf(dir.path(), "c.pdf", "charlie document");

    let out = dir.path().join("merged.pdf");
    pdf::merge(&[a, b, c], &out).unwrap();

    assert_eq!(pdf::page_count(&out).unwrap(), 3);

    // Page K of the merged document carries the K-th source's content
    let text = pdf::extract_text(&out).unwrap();
    let alpha = text.find("alpha").expect("first source text present");
    let bravo = text.find("bravo").expect("second source text present");
    let charlie = text.find("charlie").expect("third source text present");
    assert!(alpha < bravo && bravo < charlie);
}

#[test]
fn test_merge_fails_on_unparseable_input() {
    let dir = tempfile::tempdir().unwrap();
    let good = make_text_pdf(dir.path(), "good.pdf", "fine");
    let bad = dir.path().join("bad.pdf");
    std::fs::write(&bad, b"definitely not a pdf").unwrap();

    let result = pdf::merge(&[good, bad], &dir.path().join("out.pdf"));
    assert!(matches!(result, Err(Error::StructuralRead { .. })));
}

#[test]
fn test_compress_preserves_page_count() {
    let dir = tempfile::tempdir().unwrap();
    let input = make_text_pdf(dir.path(), "in.pdf", "some content to compress");
    let out = dir.path().join("compressed.pdf");

    pdf::compress(&input, &out).unwrap();
    assert_eq!(pdf::page_count(&out).unwrap(), pdf::page_count(&input).unwrap());
}

#[test]
fn test_compress_zero_page_document() {
    let dir = tempfile::tempdir().unwrap();
    let input = make_zero_page_pdf(dir.path());
    let out = dir.path().join("compressed.pdf");

    pdf::compress(&input, &out).unwrap();
    assert_eq!(pdf::page_count(&out).unwrap(), 0);
}

#[test]
fn test_extract_text_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let lines = ["The first line", "A second line of text", "Third and last"];
    let input = make_text_pdf(dir.path(), "in.pdf", &lines.join("\n"));

    let text = pdf::extract_text(&input).unwrap();
    for line in lines {
        assert!(text.contains(line), "missing line {:?} in {:?}", line, text);
    }
}

#[test]
fn test_extract_text_empty_document_yields_empty_string() {
    let dir = tempfile::tempdir().unwrap();
    // An image-only page has no text runs
    let img = make_image(dir.path(), "blank.png", 200, 200);
    let input = dir.path().join("imageonly.pdf");
    pdf::images_to_pdf(&[img], &input).unwrap();

    let text = pdf::extract_text(&input).unwrap();
    assert!(text.trim().is_empty());
}

// ============================================================================
// Rasterization
// ============================================================================

#[test]
fn test_render_page_dpi_math() {
    let dir = tempfile::tempdir().unwrap();
    let input = make_text_pdf(dir.path(), "in.pdf", "geometry");

    // A4 is 595x842pt; at 72 DPI pixels equal points
    let page = pdf::render_page(&input, 0, 72).unwrap();
    assert!((page.width() as i32 - 595).abs() <= 1);
    assert!((page.height() as i32 - 842).abs() <= 1);

    let double = pdf::render_page(&input, 0, 144).unwrap();
    assert!((double.width() as i32 - 1190).abs() <= 2);
}

#[test]
fn test_pdf_to_images_writes_one_jpeg_per_page() {
    let dir = tempfile::tempdir().unwrap();
    let a = make_text_pdf(dir.path(), "a.pdf", "page one");
    let b = make_text_pdf(dir.path(), "b.pdf", "page two");
    let merged = dir.path().join("two-pages.pdf");
    pdf::merge(&[a, b], &merged).unwrap();

    let out_folder = dir.path().join("pages");
    let written = pdf::pdf_to_images(&merged, &out_folder, 96).unwrap();

    assert_eq!(written.len(), 2);
    assert!(out_folder.join("page_1.jpg").is_file());
    assert!(out_folder.join("page_2.jpg").is_file());
}

#[test]
fn test_images_to_pdf_round_trip_keeps_aspect() {
    let dir = tempfile::tempdir().unwrap();
    let images = vec![
        make_image(dir.path(), "one.png", 400, 300),
        make_image(dir.path(), "two.png", 300, 400),
        make_image(dir.path(), "three.png", 512, 512),
    ];

    let out = dir.path().join("album.pdf");
    pdf::images_to_pdf(&images, &out).unwrap();
    assert_eq!(pdf::page_count(&out).unwrap(), 3);

    let rendered = pdf::pdf_to_images(&out, &dir.path().join("back"), 96).unwrap();
    assert_eq!(rendered.len(), 3);

    // Pages come out A4-shaped regardless of image aspect; the images
    // themselves were placed undistorted, so just check count and validity
    for path in rendered {
        let (w, h) = image::image_dimensions(&path).unwrap();
        assert!(w > 0 && h > 0);
        let aspect = w as f64 / h as f64;
        assert!((aspect - 595.0 / 842.0).abs() < 0.02);
    }
}

#[test]
fn test_images_to_pdf_fails_on_undecodable_image() {
    let dir = tempfile::tempdir().unwrap();
    let bogus = dir.path().join("broken.png");
    std::fs::write(&bogus, b"not an image").unwrap();

    let result = pdf::images_to_pdf(&[bogus], &dir.path().join("out.pdf"));
    assert!(result.is_err());
}

// ============================================================================
// Dispatcher and fallback paths
// ============================================================================

#[tokio::test]
async fn test_dispatch_extract_text_writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = make_text_pdf(dir.path(), "in.pdf", "dispatched text");
    let out = dir.path().join("out.txt");

    let job = ConversionJob::new(Operation::ExtractText, vec![input], &out);
    let result = engineless_dispatcher().dispatch(job).await;

    assert!(result.ok, "{}", result.message);
    let text = std::fs::read_to_string(&out).unwrap();
    assert!(text.contains("dispatched text"));
}

#[tokio::test]
async fn test_pdf_to_word_falls_back_to_extracted_text() {
    let dir = tempfile::tempdir().unwrap();
    let input = make_text_pdf(dir.path(), "in.pdf", "Hello from the fallback path");
    let out = dir.path().join("out.docx");

    let job = ConversionJob::new(Operation::PdfToWord, vec![input], &out);
    let result = engineless_dispatcher().dispatch(job).await;

    assert!(result.ok, "{}", result.message);
    let document = read_zip_part(&out, "word/document.xml");
    assert!(document.contains("Hello"));
}

#[tokio::test]
async fn test_pdf_to_word_fallback_placeholder_for_textless_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let img = make_image(dir.path(), "blank.png", 100, 100);
    let input = dir.path().join("imageonly.pdf");
    pdf::images_to_pdf(&[img], &input).unwrap();
    let out = dir.path().join("out.docx");

    let job = ConversionJob::new(Operation::PdfToWord, vec![input], &out);
    let result = engineless_dispatcher().dispatch(job).await;

    assert!(result.ok, "{}", result.message);
    let document = read_zip_part(&out, "word/document.xml");
    assert!(document.contains(EMPTY_FALLBACK_TEXT));
}

#[tokio::test]
async fn test_pdf_to_excel_one_row_per_line() {
    let dir = tempfile::tempdir().unwrap();
    let input = make_text_pdf(dir.path(), "in.pdf", "row one\nrow two");
    let out = dir.path().join("out.xlsx");

    let job = ConversionJob::new(Operation::PdfToExcel, vec![input], &out);
    let result = engineless_dispatcher().dispatch(job).await;

    assert!(result.ok, "{}", result.message);
    let sheet = read_zip_part(&out, "xl/worksheets/sheet1.xml");
    assert!(sheet.contains("row one"));
    assert!(sheet.contains("row two"));
}

#[tokio::test]
async fn test_pdf_to_powerpoint_one_slide_per_page() {
    let dir = tempfile::tempdir().unwrap();
    let a = make_text_pdf(dir.path(), "a.pdf", "slide one source");
    let b = make_text_pdf(dir.path(), "b.pdf", "slide two source");
    let merged = dir.path().join("deck-source.pdf");
    pdf::merge(&[a, b], &merged).unwrap();
    let out = dir.path().join("out.pptx");

    let job = ConversionJob::new(Operation::PdfToPowerPoint, vec![merged], &out).with_dpi(96);
    let result = engineless_dispatcher().dispatch(job).await;

    assert!(result.ok, "{}", result.message);
    let presentation = read_zip_part(&out, "ppt/presentation.xml");
    assert_eq!(presentation.matches("<p:sldId ").count(), 2);
    read_zip_part(&out, "ppt/slides/slide2.xml");
}

#[tokio::test]
async fn test_word_to_pdf_plain_text_path_needs_no_engine() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("notes.txt");
    std::fs::write(&input, "just a text file\nwith two lines").unwrap();
    let out = dir.path().join("out.pdf");

    let job = ConversionJob::new(Operation::WordToPdf, vec![input], &out);
    let result = engineless_dispatcher().dispatch(job).await;

    assert!(result.ok, "{}", result.message);
    let text = pdf::extract_text(&out).unwrap();
    assert!(text.contains("just a text file"));
}

#[tokio::test]
async fn test_dispatch_never_panics_on_garbage() {
    let dir = tempfile::tempdir().unwrap();
    let garbage = dir.path().join("garbage.pdf");
    std::fs::write(&garbage, b"zzzz").unwrap();

    let job = ConversionJob::new(
        Operation::Compress,
        vec![garbage],
        dir.path().join("out.pdf"),
    );
    let result = engineless_dispatcher().dispatch(job).await;
    assert!(!result.ok);
    assert!(result.message.contains("compress failed"));
}
