//! Rasterisation: turn a loaded document into exactly one `DynamicImage`.
//!
//! Raster inputs are decoded directly. PDFs go through an injected
//! [`PdfRasterizer`]; when none is configured the stage fails with
//! [`ValidationError::PdfSupportUnavailable`] before touching the bytes. Only
//! the first page of a PDF is ever rendered.
//!
//! Everything here is blocking and CPU-bound; callers run it inside
//! `spawn_blocking`.

use crate::error::ValidationError;
use crate::pipeline::input::{DocumentKind, LoadedDocument};
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// PDF points per inch.
const POINTS_PER_INCH: f32 = 72.0;

/// Renders the first page of a PDF byte stream.
pub trait PdfRasterizer: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Render page 1 at `dpi`. Returns `Ok(None)` when the document has no pages.
    fn rasterize_first_page(
        &self,
        pdf: &[u8],
        dpi: u32,
    ) -> Result<Option<DynamicImage>, ValidationError>;
}

/// Produce the single raster image for a loaded document.
pub fn rasterize(
    doc: &LoadedDocument,
    rasterizer: Option<&dyn PdfRasterizer>,
    dpi: u32,
) -> Result<DynamicImage, ValidationError> {
    match doc.kind {
        DocumentKind::Pdf => {
            let rasterizer = rasterizer.ok_or(ValidationError::PdfSupportUnavailable)?;
            debug!("Rasterising first PDF page with {} at {} dpi", rasterizer.name(), dpi);
            let image = rasterizer
                .rasterize_first_page(&doc.bytes, dpi)?
                .ok_or(ValidationError::EmptyDocument)?;
            info!(
                "Rendered {} page 1 → {}x{} px",
                doc.origin,
                image.width(),
                image.height()
            );
            Ok(image)
        }
        DocumentKind::Image => {
            let image = image::load_from_memory(&doc.bytes)?;
            debug!(
                "Decoded {} → {}x{} px",
                doc.origin,
                image.width(),
                image.height()
            );
            Ok(image)
        }
    }
}

// ── pdfium ───────────────────────────────────────────────────────────────

/// [`PdfRasterizer`] backed by the pdfium shared library.
///
/// Stateless: `Pdfium` is bound per call, the OS caches the `dlopen`.
#[derive(Debug, Clone)]
pub struct PdfiumRasterizer {
    /// Directory holding the platform pdfium library. `None` searches next to
    /// the executable, then the system library path.
    library_dir: Option<PathBuf>,
    /// Longest rendered edge in pixels.
    max_pixels: u32,
}

impl PdfiumRasterizer {
    /// Bind pdfium from the default locations, failing if it cannot be loaded.
    pub fn new(max_pixels: u32) -> Result<Self, ValidationError> {
        let rasterizer = Self {
            library_dir: None,
            max_pixels,
        };
        rasterizer.bind()?;
        Ok(rasterizer)
    }

    /// Bind pdfium from an explicit directory.
    pub fn from_dir(dir: impl Into<PathBuf>, max_pixels: u32) -> Result<Self, ValidationError> {
        let rasterizer = Self {
            library_dir: Some(dir.into()),
            max_pixels,
        };
        rasterizer.bind()?;
        Ok(rasterizer)
    }

    /// The capability if pdfium is loadable in this deployment, `None` otherwise.
    pub fn detect(max_pixels: u32) -> Option<Arc<dyn PdfRasterizer>> {
        match Self::new(max_pixels) {
            Ok(r) => Some(Arc::new(r)),
            Err(e) => {
                warn!("PDF support disabled: {}", e);
                None
            }
        }
    }

    fn bind(&self) -> Result<Pdfium, ValidationError> {
        if let Some(ref dir) = self.library_dir {
            let lib_path = Pdfium::pdfium_platform_library_name_at_path(dir.as_path());
            let bindings = Pdfium::bind_to_library(&lib_path).map_err(|e| {
                ValidationError::PdfRenderFailed {
                    detail: format!("failed to load pdfium from {}: {e:?}", lib_path.display()),
                }
            })?;
            return Ok(Pdfium::new(bindings));
        }

        if let Some(exe_dir) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|p| p.to_path_buf()))
        {
            let lib_path = Pdfium::pdfium_platform_library_name_at_path(exe_dir.as_path());
            if let Ok(bindings) = Pdfium::bind_to_library(&lib_path) {
                debug!("Loaded pdfium from {}", exe_dir.display());
                return Ok(Pdfium::new(bindings));
            }
        }

        let bindings = Pdfium::bind_to_system_library().map_err(|e| {
            ValidationError::PdfRenderFailed {
                detail: format!("pdfium library not found: {e:?}"),
            }
        })?;
        Ok(Pdfium::new(bindings))
    }
}

impl PdfRasterizer for PdfiumRasterizer {
    fn name(&self) -> &str {
        "pdfium"
    }

    fn rasterize_first_page(
        &self,
        pdf: &[u8],
        dpi: u32,
    ) -> Result<Option<DynamicImage>, ValidationError> {
        let pdfium = self.bind()?;
        let document = pdfium
            .load_pdf_from_byte_slice(pdf, None)
            .map_err(|e| ValidationError::PdfRenderFailed {
                detail: format!("failed to load PDF: {e:?}"),
            })?;

        let pages = document.pages();
        let total_pages = pages.len() as usize;
        if total_pages == 0 {
            return Ok(None);
        }
        if total_pages > 1 {
            debug!("PDF has {} pages; only page 1 is inspected", total_pages);
        }

        let page = pages.get(0).map_err(|e| ValidationError::PdfRenderFailed {
            detail: format!("page 1: {e:?}"),
        })?;

        let max_edge = i32::try_from(self.max_pixels).unwrap_or(i32::MAX);
        let render_config = PdfRenderConfig::new()
            .scale_page_by_factor(dpi as f32 / POINTS_PER_INCH)
            .set_maximum_width(max_edge)
            .set_maximum_height(max_edge);

        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|e| ValidationError::PdfRenderFailed {
                detail: format!("page 1: {e:?}"),
            })?;

        Ok(Some(bitmap.as_image()))
    }
}
