//! Error types for the conversion engine

use thiserror::Error;

/// Result type alias for the conversion engine
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the conversion engine
#[derive(Error, Debug)]
pub enum Error {
    /// An input could not be parsed as the expected document type
    #[error("not a valid document: {reason}")]
    StructuralRead { reason: String },

    /// The external automation engine could not be launched
    #[error("automation engine unavailable: {reason}")]
    EngineUnavailable { reason: String },

    /// The engine launched but open/export/save failed mid-sequence
    #[error("engine operation failed: {reason}")]
    EngineOperation { reason: String },

    /// The job itself is malformed (wrong input count, bad path)
    #[error("invalid conversion job: {reason}")]
    InvalidJob { reason: String },

    /// PDFium error
    #[error("PDFium error: {reason}")]
    Pdfium { reason: String },

    /// Image decode/encode error
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// OOXML container error
    #[error("archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
