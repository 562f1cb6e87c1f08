//! Conversion job types
//!
//! A [`ConversionJob`] is created per user-initiated action, is immutable once
//! dispatched, and is dropped after the operation completes or fails. Nothing
//! persists between jobs.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Default rendering resolution for raster pipelines.
pub const DEFAULT_DPI: u32 = 200;

/// Closed set of supported conversion directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operation {
    /// Append every page of every input PDF into one document
    Merge,
    /// Re-serialize a PDF with maximum structural compression
    Compress,
    /// Extract per-page text, written to the output path
    ExtractText,
    /// One PDF page per input image, auto-scaled to an A4 canvas
    ImagesToPdf,
    /// Render every page as `page_{n}.jpg` into the output folder
    PdfToImages,
    /// Word document (or plain text) to PDF
    WordToPdf,
    /// PDF to Word document, with a text-based fallback path
    PdfToWord,
    /// Spreadsheet to PDF
    ExcelToPdf,
    /// PDF text lines into column 1 of a new workbook
    PdfToExcel,
    /// Presentation to PDF
    PowerPointToPdf,
    /// One slide per rendered PDF page, pictures centered
    PdfToPowerPoint,
}

impl Operation {
    /// Stable kebab-case name, used by the CLI and in log output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Merge => "merge",
            Operation::Compress => "compress",
            Operation::ExtractText => "extract-text",
            Operation::ImagesToPdf => "images-to-pdf",
            Operation::PdfToImages => "pdf-to-images",
            Operation::WordToPdf => "word-to-pdf",
            Operation::PdfToWord => "pdf-to-word",
            Operation::ExcelToPdf => "excel-to-pdf",
            Operation::PdfToExcel => "pdf-to-excel",
            Operation::PowerPointToPdf => "powerpoint-to-pdf",
            Operation::PdfToPowerPoint => "pdf-to-powerpoint",
        }
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "merge" => Ok(Operation::Merge),
            "compress" => Ok(Operation::Compress),
            "extract-text" => Ok(Operation::ExtractText),
            "images-to-pdf" => Ok(Operation::ImagesToPdf),
            "pdf-to-images" => Ok(Operation::PdfToImages),
            "word-to-pdf" => Ok(Operation::WordToPdf),
            "pdf-to-word" => Ok(Operation::PdfToWord),
            "excel-to-pdf" => Ok(Operation::ExcelToPdf),
            "pdf-to-excel" => Ok(Operation::PdfToExcel),
            "powerpoint-to-pdf" => Ok(Operation::PowerPointToPdf),
            "pdf-to-powerpoint" => Ok(Operation::PdfToPowerPoint),
            other => Err(format!("unknown operation: {}", other)),
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One conversion request: an operation, its ordered inputs, and one output path.
///
/// For `PdfToImages` the output path names the target folder rather than a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionJob {
    pub operation: Operation,
    /// Ordered input file paths. Arity is validated by the handler, not here.
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
    /// Target rendering resolution for raster pipelines; defaults to [`DEFAULT_DPI`].
    pub dpi: Option<u32>,
}

impl ConversionJob {
    pub fn new(
        operation: Operation,
        inputs: Vec<PathBuf>,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            operation,
            inputs,
            output: output.into(),
            dpi: None,
        }
    }

    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = Some(dpi);
        self
    }

    pub fn dpi(&self) -> u32 {
        self.dpi.unwrap_or(DEFAULT_DPI)
    }
}

/// Outcome of a dispatched job. There is no partial-success state: either the
/// output exists in the target format or the message describes why not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionResult {
    pub ok: bool,
    pub message: String,
}

impl ConversionResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_round_trips_through_name() {
        let ops = [
            Operation::Merge,
            Operation::Compress,
            Operation::ExtractText,
            Operation::ImagesToPdf,
            Operation::PdfToImages,
            Operation::WordToPdf,
            Operation::PdfToWord,
            Operation::ExcelToPdf,
            Operation::PdfToExcel,
            Operation::PowerPointToPdf,
            Operation::PdfToPowerPoint,
        ];
        for op in ops {
            assert_eq!(op.as_str().parse::<Operation>().unwrap(), op);
        }
    }

    #[test]
    fn test_unknown_operation_name() {
        assert!("pdf-to-midi".parse::<Operation>().is_err());
    }

    #[test]
    fn test_job_dpi_default() {
        let job = ConversionJob::new(Operation::PdfToImages, vec!["in.pdf".into()], "out");
        assert_eq!(job.dpi(), DEFAULT_DPI);
        assert_eq!(job.with_dpi(300).dpi(), 300);
    }
}
