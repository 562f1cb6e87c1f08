//! Office document automation: engine traits, the five-step bridge protocol,
//! the LibreOffice implementation, and the OOXML composer facades

pub mod bridge;
pub mod engine;
pub mod ooxml;
pub mod soffice;
pub mod worker;

pub use bridge::AutomationBridge;
pub use engine::{DocumentEngine, EngineFactory, EngineFamily, ExportFormat, SlideDeck, Workbook};
pub use ooxml::{write_docx_from_text, PptxDeck, XlsxWorkbook};
pub use soffice::{SofficeEngine, SofficeFactory};
