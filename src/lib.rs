//! Document conversion engine
//!
//! Converts documents between formats:
//! - PDF structural operations: merge, compress, text extraction
//! - image <-> PDF via a PDFium rasterization pipeline
//! - Office formats (Word/Excel/PowerPoint) <-> PDF via headless automation
//!   engines driven through a guaranteed-release protocol
//!
//! Build a [`ConversionJob`] and hand it to a [`Dispatcher`]; every call is
//! independently reproducible and leaves no state behind.

pub mod dispatch;
pub mod error;
pub mod job;
pub mod office;
pub mod pdf;
pub mod workspace;

pub use dispatch::{Dispatcher, EMPTY_FALLBACK_TEXT};
pub use error::{Error, Result};
pub use job::{ConversionJob, ConversionResult, Operation, DEFAULT_DPI};
pub use workspace::TempWorkspace;
