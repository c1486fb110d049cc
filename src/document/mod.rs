//! Document loading
//!
//! Turns an uploaded byte buffer into an ordered sequence of page images
//! ready for OCR. PDFs are rasterized page by page via MuPDF; JPEG/PNG
//! uploads pass through as a single page.

mod error;
mod loader;
mod types;

pub use error::DocumentError;
pub use loader::DocumentLoader;
pub use types::{MediaType, PageImage};
