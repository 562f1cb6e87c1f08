//! qpdf FFI wrapper for structural PDF manipulation
//!
//! Merge and compress operate directly on the PDF object graph via the qpdf
//! crate (vendored FFI). Documents are loaded fully into memory per call;
//! no parsed structures are cached across calls.

use crate::error::{Error, Result};
use qpdf::{ObjectStreamMode, QPdf};
use std::path::Path;

/// Map qpdf crate errors to the structural-read taxonomy
fn map_qpdf_error(e: qpdf::QPdfError) -> Error {
    Error::StructuralRead {
        reason: e.to_string(),
    }
}

fn read_pdf(path: &Path) -> Result<QPdf> {
    let data = std::fs::read(path)?;
    QPdf::read_from_memory(&data).map_err(|e| Error::StructuralRead {
        reason: format!("{}: {}", path.display(), e),
    })
}

/// Merge multiple PDFs into one.
///
/// Pages are appended in input-list order: page N of file K precedes page 1
/// of file K+1. Fails if any input cannot be parsed as a valid PDF.
pub fn merge(inputs: &[std::path::PathBuf], output: &Path) -> Result<()> {
    if inputs.is_empty() {
        return Err(Error::InvalidJob {
            reason: "merge requires at least one input".to_string(),
        });
    }

    let dest = QPdf::empty();

    for input in inputs {
        let source = read_pdf(input)?;
        let pages = source.get_pages().map_err(|e| Error::StructuralRead {
            reason: format!("{}: {}", input.display(), e),
        })?;

        for page in &pages {
            let copied = dest.copy_from_foreign(page);
            dest.add_page(&copied, false).map_err(map_qpdf_error)?;
        }
    }

    let merged = dest.writer().write_to_memory().map_err(map_qpdf_error)?;
    std::fs::write(output, merged)?;
    Ok(())
}

/// Compress a PDF by re-serializing with object streams and stream compression.
///
/// A zero-page input produces an equivalent zero-page output, not an error.
pub fn compress(input: &Path, output: &Path) -> Result<()> {
    let source = read_pdf(input)?;

    let mut writer = source.writer();
    writer
        .object_stream_mode(ObjectStreamMode::Generate)
        .compress_streams(true)
        .normalize_content(true)
        .preserve_unreferenced_objects(false);
    let compressed = writer.write_to_memory().map_err(map_qpdf_error)?;

    std::fs::write(output, compressed)?;
    Ok(())
}

/// Get the page count of a PDF on disk.
pub fn page_count(input: &Path) -> Result<u32> {
    let source = read_pdf(input)?;
    source.get_num_pages().map_err(map_qpdf_error)
}
