//! Configuration types for certificate validation.
//!
//! All behaviour is controlled through [`ValidatorConfig`], built via its
//! [`ValidatorConfigBuilder`]. The OCR engine and the optional PDF rasterizer
//! are held as `Arc` trait objects so one config can be cloned cheaply and
//! shared by concurrent validations.

use crate::error::ValidationError;
use crate::pipeline::check::DEFAULT_KEYWORDS;
use crate::pipeline::ocr::{OcrEngine, TesseractEngine};
use crate::pipeline::preprocess::DEFAULT_CONTRAST_FACTOR;
use crate::pipeline::render::{PdfRasterizer, PdfiumRasterizer};
use std::fmt;
use std::sync::Arc;

/// Configuration for a certificate validation.
///
/// Built via [`ValidatorConfig::builder()`] or using
/// [`ValidatorConfig::default()`].
///
/// # Example
/// ```rust,no_run
/// use edgequake_certcheck::ValidatorConfig;
///
/// let config = ValidatorConfig::builder()
///     .download_timeout_secs(10)
///     .detect_pdf_support()
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ValidatorConfig {
    /// Timeout for the single GET of a remote certificate. Default: 30.
    pub download_timeout_secs: u64,

    /// Rendering density for the first PDF page. Range: 72–600. Default: 300.
    pub pdf_dpi: u32,

    /// Cap on the longest rendered PDF edge in pixels. Range: 100–16384.
    /// Default: 6000.
    ///
    /// 300 dpi on a Letter page is 2550 × 3300 px; the cap only bites on
    /// poster-sized pages.
    pub max_rendered_pixels: u32,

    /// Linear contrast multiplier applied after grayscale conversion. Default: 2.0.
    pub contrast_factor: f32,

    /// Qualifying role keywords, lower-case. Default: diet, dietitian,
    /// health coach, nutritionist.
    pub keywords: Vec<String>,

    /// Text recogniser. Default: [`TesseractEngine`] from `PATH`.
    pub ocr_engine: Arc<dyn OcrEngine>,

    /// PDF capability. `None` makes every PDF fail with
    /// [`ValidationError::PdfSupportUnavailable`].
    ///
    /// [`ValidatorConfig::default()`] installs [`PdfiumRasterizer`] when the
    /// pdfium library can be bound. The builder starts without one; call
    /// [`ValidatorConfigBuilder::detect_pdf_support`] or
    /// [`ValidatorConfigBuilder::pdf_rasterizer`] to enable PDFs.
    pub pdf_rasterizer: Option<Arc<dyn PdfRasterizer>>,
}

const DEFAULT_MAX_RENDERED_PIXELS: u32 = 6000;

/// Upper bound for `max_rendered_pixels`. Keeps the pdfium bitmap size sane
/// and the value representable as the `i32` pdfium expects.
pub const MAX_RENDERED_PIXELS_LIMIT: u32 = 16_384;

impl ValidatorConfig {
    /// Default values with no PDF capability. Never touches pdfium.
    fn base() -> Self {
        Self {
            download_timeout_secs: 30,
            pdf_dpi: 300,
            max_rendered_pixels: DEFAULT_MAX_RENDERED_PIXELS,
            contrast_factor: DEFAULT_CONTRAST_FACTOR,
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            ocr_engine: Arc::new(TesseractEngine::default()),
            pdf_rasterizer: None,
        }
    }
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            pdf_rasterizer: PdfiumRasterizer::detect(DEFAULT_MAX_RENDERED_PIXELS),
            ..Self::base()
        }
    }
}

impl fmt::Debug for ValidatorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorConfig")
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field("pdf_dpi", &self.pdf_dpi)
            .field("max_rendered_pixels", &self.max_rendered_pixels)
            .field("contrast_factor", &self.contrast_factor)
            .field("keywords", &self.keywords)
            .field("ocr_engine", &self.ocr_engine.name())
            .field(
                "pdf_rasterizer",
                &self.pdf_rasterizer.as_ref().map(|r| r.name().to_string()),
            )
            .finish()
    }
}

impl ValidatorConfig {
    /// Create a new builder for `ValidatorConfig`.
    ///
    /// The builder starts with PDF support off and does not load pdfium.
    pub fn builder() -> ValidatorConfigBuilder {
        ValidatorConfigBuilder {
            config: Self::base(),
            detect_pdf: false,
        }
    }
}

/// Builder for [`ValidatorConfig`].
#[derive(Debug)]
pub struct ValidatorConfigBuilder {
    config: ValidatorConfig,
    /// Bind pdfium in `build()`, after the pixel cap is final.
    detect_pdf: bool,
}

impl ValidatorConfigBuilder {
    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn pdf_dpi(mut self, dpi: u32) -> Self {
        self.config.pdf_dpi = dpi;
        self
    }

    pub fn max_rendered_pixels(mut self, px: u32) -> Self {
        self.config.max_rendered_pixels = px;
        self
    }

    pub fn contrast_factor(mut self, factor: f32) -> Self {
        self.config.contrast_factor = factor;
        self
    }

    /// Replace the qualifying keywords. Matching is case-insensitive.
    pub fn keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.config.keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().to_lowercase())
            .collect();
        self
    }

    pub fn ocr_engine(mut self, engine: Arc<dyn OcrEngine>) -> Self {
        self.config.ocr_engine = engine;
        self
    }

    pub fn pdf_rasterizer(mut self, rasterizer: Arc<dyn PdfRasterizer>) -> Self {
        self.config.pdf_rasterizer = Some(rasterizer);
        self.detect_pdf = false;
        self
    }

    /// Use pdfium for PDFs if the library can be bound at `build()` time.
    /// When it cannot, PDF support stays off and a warning is logged.
    pub fn detect_pdf_support(mut self) -> Self {
        self.detect_pdf = true;
        self
    }

    /// Treat every PDF as unsupported.
    pub fn without_pdf_support(mut self) -> Self {
        self.config.pdf_rasterizer = None;
        self.detect_pdf = false;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(mut self) -> Result<ValidatorConfig, ValidationError> {
        let c = &self.config;
        if c.download_timeout_secs == 0 {
            return Err(ValidationError::InvalidConfig(
                "Download timeout must be ≥ 1 second".into(),
            ));
        }
        if c.pdf_dpi < 72 || c.pdf_dpi > 600 {
            return Err(ValidationError::InvalidConfig(format!(
                "PDF DPI must be 72–600, got {}",
                c.pdf_dpi
            )));
        }
        if !(100..=MAX_RENDERED_PIXELS_LIMIT).contains(&c.max_rendered_pixels) {
            return Err(ValidationError::InvalidConfig(format!(
                "max_rendered_pixels must be 100–{}, got {}",
                MAX_RENDERED_PIXELS_LIMIT, c.max_rendered_pixels
            )));
        }
        if !c.contrast_factor.is_finite() || c.contrast_factor < 0.0 {
            return Err(ValidationError::InvalidConfig(format!(
                "Contrast factor must be a finite value ≥ 0, got {}",
                c.contrast_factor
            )));
        }
        if c.keywords.is_empty() {
            return Err(ValidationError::InvalidConfig(
                "At least one keyword is required".into(),
            ));
        }
        // A blank keyword is a substring of every text.
        if let Some(pos) = c.keywords.iter().position(|k| k.trim().is_empty()) {
            return Err(ValidationError::InvalidConfig(format!(
                "Keyword #{} is blank",
                pos + 1
            )));
        }
        if self.detect_pdf {
            self.config.pdf_rasterizer = PdfiumRasterizer::detect(self.config.max_rendered_pixels);
        }
        Ok(self.config)
    }
}
