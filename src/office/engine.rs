//! Capability traits for external document engines
//!
//! The engines behind these traits are stateful and must be driven through a
//! rigid launch -> open -> export -> close -> quit protocol, one conversion
//! per engine instance. The traits expose only the operations the conversion
//! handlers actually use; everything else about the underlying automation
//! surface stays hidden.

use crate::error::Result;
use std::path::Path;

/// The office-application family a conversion needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineFamily {
    /// Word-processor class (doc/docx/odt/txt)
    Word,
    /// Spreadsheet class (xls/xlsx/ods)
    Calc,
    /// Presentation class (ppt/pptx/odp)
    Impress,
}

impl EngineFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineFamily::Word => "word",
            EngineFamily::Calc => "calc",
            EngineFamily::Impress => "impress",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            EngineFamily::Word => 0,
            EngineFamily::Calc => 1,
            EngineFamily::Impress => 2,
        }
    }
}

/// Target format for an engine export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Docx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
        }
    }
}

/// One external document engine instance, scoped to a single conversion call.
///
/// `launch`, `open`, and `export` may fail and their errors propagate to the
/// caller. `close` and `quit` are cleanup: they run on every exit path, must
/// not fail the conversion, and swallow their own errors (logged at most).
pub trait DocumentEngine: Send {
    /// Start a fresh engine instance, headless, alerts suppressed.
    fn launch(&mut self) -> Result<()>;

    /// Open exactly one input document, read-only where supported.
    fn open(&mut self, input: &Path) -> Result<()>;

    /// Perform exactly one export into the target format.
    fn export(&mut self, output: &Path, format: ExportFormat) -> Result<()>;

    /// Close the opened document, discarding any incidental edits.
    fn close(&mut self);

    /// Quit the engine and release everything it held.
    fn quit(&mut self);
}

/// Presentation composer facade: blank slides, one centered picture each.
pub trait SlideDeck: Send {
    /// Slide canvas dimensions in points.
    fn slide_size(&self) -> (f64, f64);

    /// Append a blank slide carrying one picture at the given rectangle (points).
    fn add_slide_with_picture(
        &mut self,
        image: &Path,
        left: f64,
        top: f64,
        width: f64,
        height: f64,
    ) -> Result<()>;

    /// Write the presentation to disk.
    fn save(&mut self, output: &Path) -> Result<()>;
}

/// Workbook composer facade: cell writes on a single fresh sheet.
pub trait Workbook: Send {
    /// Set a cell value; `row` and `col` are zero-based.
    fn set_cell(&mut self, row: u32, col: u32, value: &str);

    /// Write the workbook to disk.
    fn save(&mut self, output: &Path) -> Result<()>;
}

/// Produces engine instances for the bridge. One instance per call; instances
/// are never reused across jobs or shared between concurrent jobs.
pub trait EngineFactory: Send + Sync {
    fn document_engine(&self, family: EngineFamily) -> Box<dyn DocumentEngine>;
    fn slide_deck(&self) -> Box<dyn SlideDeck>;
    fn workbook(&self) -> Box<dyn Workbook>;
}
