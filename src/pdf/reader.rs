//! PDFium-backed page rasterization and text extraction
//!
//! Everything here is job-scoped: a document is opened, walked, and closed
//! within a single call. No parsed structures survive between calls.

use crate::error::{Error, Result};
use crate::workspace::TempWorkspace;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};

/// Get PDFium instance (creates new instance each time - PDFium is not thread-safe)
fn create_pdfium() -> Result<Pdfium> {
    // Try to bind to system library or use static linking
    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| {
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(
                "/opt/pdfium/lib",
            ))
        })
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|e| Error::Pdfium {
            reason: format!("Failed to initialize PDFium: {}", e),
        })?;

    Ok(Pdfium::new(bindings))
}

fn load_document<'a>(pdfium: &'a Pdfium, data: &'a [u8], origin: &Path) -> Result<PdfDocument<'a>> {
    if data.len() < 4 || &data[0..4] != b"%PDF" {
        return Err(Error::StructuralRead {
            reason: format!("{}: not a PDF file", origin.display()),
        });
    }

    pdfium
        .load_pdf_from_byte_slice(data, None)
        .map_err(|e| Error::StructuralRead {
            reason: format!("{}: {}", origin.display(), e),
        })
}

/// One rasterized page: a fixed 32-bit RGBA pixel buffer plus its source index.
///
/// Owned exclusively by the rasterization step that produced it; it lives only
/// until written to disk or consumed by a page-composition step.
#[derive(Debug)]
pub struct PageImage {
    /// Zero-based source page index
    pub page_index: u32,
    pub image: image::RgbaImage,
}

impl PageImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Convert raster dimensions to page/slide canvas dimensions.
///
/// `pixels_to_points(200, 200) == 72.0`
pub fn pixels_to_points(pixels: u32, dpi: u32) -> f64 {
    pixels as f64 * 72.0 / dpi as f64
}

/// Scale `(w, h)` to fit inside `(max_w, max_h)` preserving aspect ratio.
pub(crate) fn fit_within(w: f32, h: f32, max_w: f32, max_h: f32) -> (f32, f32) {
    let scale = (max_w / w).min(max_h / h);
    (w * scale, h * scale)
}

fn render_page_image(page: &PdfPage, page_index: u32, dpi: u32) -> Result<PageImage> {
    // DPI determines pixel dimensions: page-size-in-points * dpi / 72
    let px_width = (page.width().value * dpi as f32 / 72.0).round().max(1.0) as i32;
    let px_height = (page.height().value * dpi as f32 / 72.0).round().max(1.0) as i32;

    let config = PdfRenderConfig::new()
        .set_target_size(px_width, px_height)
        .render_form_data(true)
        .render_annotations(true);

    let bitmap = page.render_with_config(&config).map_err(|e| Error::Pdfium {
        reason: format!("failed to render page {}: {}", page_index + 1, e),
    })?;

    Ok(PageImage {
        page_index,
        image: bitmap.as_image().to_rgba8(),
    })
}

/// Render a single page to a pixel buffer at the given resolution.
pub fn render_page(input: &Path, page_index: u32, dpi: u32) -> Result<PageImage> {
    let data = std::fs::read(input)?;
    let pdfium = create_pdfium()?;
    let document = load_document(&pdfium, &data, input)?;

    let page = document
        .pages()
        .get(page_index as u16)
        .map_err(|e| Error::Pdfium {
            reason: format!("failed to get page {}: {}", page_index + 1, e),
        })?;

    render_page_image(&page, page_index, dpi)
}

/// Extract text from every page, in order, joined by a newline.
///
/// Returns an empty string (not an error) for a document with no text runs.
pub fn extract_text(input: &Path) -> Result<String> {
    let data = std::fs::read(input)?;
    let pdfium = create_pdfium()?;
    let document = load_document(&pdfium, &data, input)?;

    let pages = document.pages();
    let page_count = pages.len() as u32;
    let mut texts = Vec::with_capacity(page_count as usize);

    for index in 0..page_count {
        let page = pages.get(index as u16).map_err(|e| Error::Pdfium {
            reason: format!("failed to get page {}: {}", index + 1, e),
        })?;
        let text = page.text().map_err(|e| Error::Pdfium {
            reason: format!("failed to read text of page {}: {}", index + 1, e),
        })?;
        texts.push(text.all());
    }

    Ok(texts.join("\n"))
}

/// Render every page of a PDF into `folder` as `page_{1-based}.{ext}`.
///
/// If rendering page K fails the operation aborts; pages 1..K-1 already
/// written are left on disk. No rollback.
fn render_pages_to_files(
    input: &Path,
    folder: &Path,
    dpi: u32,
    format: image::ImageFormat,
) -> Result<Vec<PathBuf>> {
    let data = std::fs::read(input)?;
    let pdfium = create_pdfium()?;
    let document = load_document(&pdfium, &data, input)?;

    let pages = document.pages();
    let page_count = pages.len() as u32;
    let ext = format.extensions_str()[0];
    let mut written = Vec::with_capacity(page_count as usize);

    for index in 0..page_count {
        let page = pages.get(index as u16).map_err(|e| Error::Pdfium {
            reason: format!("failed to get page {}: {}", index + 1, e),
        })?;
        let rendered = render_page_image(&page, index, dpi)?;

        let path = folder.join(format!("page_{}.{}", index + 1, ext));
        match format {
            // JPEG has no alpha channel
            image::ImageFormat::Jpeg => {
                DynamicImage::ImageRgba8(rendered.image)
                    .to_rgb8()
                    .save_with_format(&path, format)?;
            }
            _ => rendered.image.save_with_format(&path, format)?,
        }
        written.push(path);
    }

    tracing::debug!(
        input = %input.display(),
        pages = written.len(),
        dpi,
        "rendered pages to files"
    );

    Ok(written)
}

/// Render every page as a JPEG into `out_folder`, creating it if absent.
pub fn pdf_to_images(input: &Path, out_folder: &Path, dpi: u32) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_folder)?;
    render_pages_to_files(input, out_folder, dpi, image::ImageFormat::Jpeg)
}

/// Render every page as a PNG into a job-scoped workspace (slide pipeline).
pub fn render_to_workspace(
    input: &Path,
    workspace: &TempWorkspace,
    dpi: u32,
) -> Result<Vec<PathBuf>> {
    render_pages_to_files(input, workspace.path(), dpi, image::ImageFormat::Png)
}
