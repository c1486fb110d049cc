//! Document loader
//!
//! Rasterizes PDFs into per-page PNG images via MuPDF and wraps image
//! uploads as a single page. Rasterization runs on the blocking pool and
//! is bounded by the configured timeout.

use std::io::Cursor;
use std::time::Duration;

use mupdf::{Colorspace, Document, Matrix};

use crate::config::RenderConfig;

use super::error::DocumentError;
use super::types::{MediaType, PageImage};

/// PDF page geometry is in points (1/72 inch)
const POINTS_PER_INCH: f32 = 72.0;

/// Loads uploaded documents into page images.
pub struct DocumentLoader {
    scale: f32,
    render_timeout: Duration,
}

impl DocumentLoader {
    /// Create a loader from the rasterization config.
    pub fn new(config: &RenderConfig) -> Self {
        // Clamp scale to keep pixmap sizes sane regardless of configured DPI
        let scale = (config.dpi / POINTS_PER_INCH).clamp(0.5, 4.0);
        Self {
            scale,
            render_timeout: config.timeout,
        }
    }

    /// Load a document into an ordered sequence of page images.
    ///
    /// Empty buffers are rejected immediately. Images pass through as one
    /// page with index 0; PDFs are rasterized page by page.
    pub async fn load(
        &self,
        data: &[u8],
        media_type: MediaType,
    ) -> Result<Vec<PageImage>, DocumentError> {
        if data.is_empty() {
            return Err(DocumentError::EmptyDocument);
        }

        match media_type {
            MediaType::Pdf => self.rasterize_pdf(data.to_vec()).await,
            MediaType::Jpeg | MediaType::Png => Ok(vec![PageImage {
                index: 0,
                data: data.to_vec(),
            }]),
        }
    }

    async fn rasterize_pdf(&self, data: Vec<u8>) -> Result<Vec<PageImage>, DocumentError> {
        let scale = self.scale;
        let timeout = self.render_timeout;

        let task = tokio::task::spawn_blocking(move || -> Result<Vec<PageImage>, DocumentError> {
            let doc = Document::from_bytes(&data, "application/pdf")?;
            let page_count = doc.page_count()? as usize;

            let mut pages = Vec::with_capacity(page_count);
            for index in 0..page_count {
                let page = doc.load_page(index as i32)?;

                let matrix = Matrix::new_scale(scale, scale);
                let colorspace = Colorspace::device_rgb();
                let pixmap = page.to_pixmap(&matrix, &colorspace, true, false)?;

                let data = encode_pixmap_png(&pixmap)?;
                pages.push(PageImage { index, data });
            }

            Ok(pages)
        });

        match tokio::time::timeout(timeout, task).await {
            Ok(joined) => joined
                .map_err(|e| DocumentError::PdfRender(format!("Task join error: {}", e)))?,
            Err(_) => Err(DocumentError::RenderTimeout(timeout.as_secs())),
        }
    }
}

/// Encode a MuPDF pixmap as PNG bytes.
fn encode_pixmap_png(pixmap: &mupdf::Pixmap) -> Result<Vec<u8>, DocumentError> {
    let width = pixmap.width() as u32;
    let height = pixmap.height() as u32;
    let samples = pixmap.samples();
    let n = pixmap.n() as usize; // components per pixel

    // Convert to RGBA image buffer
    let mut rgba_buffer = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height as usize {
        for x in 0..width as usize {
            let offset = (y * width as usize + x) * n;
            let r = samples.get(offset).copied().unwrap_or(0);
            let g = samples.get(offset + 1).copied().unwrap_or(0);
            let b = samples.get(offset + 2).copied().unwrap_or(0);
            let a = if n >= 4 {
                samples.get(offset + 3).copied().unwrap_or(255)
            } else {
                255
            };
            rgba_buffer.extend_from_slice(&[r, g, b, a]);
        }
    }

    let img = image::RgbaImage::from_raw(width, height, rgba_buffer)
        .ok_or_else(|| DocumentError::PdfRender("Failed to create image buffer".to_string()))?;

    let mut output = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut output), image::ImageFormat::Png)
        .map_err(|e| DocumentError::PdfRender(format!("Failed to encode page: {}", e)))?;

    Ok(output)
}
