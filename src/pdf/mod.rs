//! PDF processing: structural operations (qpdf), rasterization (PDFium),
//! and composition (printpdf)

pub mod qpdf;
pub mod reader;
pub mod writer;

pub use qpdf::{compress, merge, page_count};
pub use reader::{
    extract_text, pdf_to_images, pixels_to_points, render_page, render_to_workspace, PageImage,
};
pub use writer::{images_to_pdf, text_to_pdf};
