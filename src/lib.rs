//! # edgequake-certcheck
//!
//! Verify a claimed professional certificate with OCR.
//!
//! A certificate image or PDF (local file or URL) is rasterised, converted to
//! high-contrast grayscale, and read by an OCR engine. The claim passes when
//! the extracted text contains the claimant's name and at least one role
//! keyword ("diet", "dietitian", "health coach", "nutritionist" by default).
//!
//! ## Pipeline Overview
//!
//! ```text
//! certificate
//!  │
//!  ├─ 1. Input       read local file or GET the URL; classify PDF vs image
//!  ├─ 2. Render      first PDF page at 300 dpi (pdfium) or decode the image
//!  ├─ 3. Preprocess  grayscale + 2.0× contrast
//!  ├─ 4. OCR         tesseract (or any OcrEngine)
//!  └─ 5. Check       case-insensitive name, then keyword containment
//! ```
//!
//! Every call returns a [`ValidationOutcome`]; failures are classified by
//! [`ErrorKind`] rather than returned as errors.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_certcheck::{validate_remote, ValidatorConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ValidatorConfig::default();
//!     let outcome = validate_remote(
//!         "Jane Doe",
//!         "https://cdn.example.com/certs/jane-doe.pdf",
//!         &config,
//!     )
//!     .await;
//!     if !outcome.success {
//!         eprintln!("rejected: {}", outcome.reason);
//!     }
//! }
//! ```
//!
//! ## External tools
//!
//! | Tool | Needed for | Missing means |
//! |------|-----------|---------------|
//! | `tesseract` binary | all OCR with the default engine | `ExtractionError` |
//! | pdfium shared library | PDF certificates | `CapabilityUnavailable` |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod outcome;
pub mod pipeline;
pub mod validate;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ValidatorConfig, ValidatorConfigBuilder};
pub use error::{ErrorKind, ValidationError};
pub use outcome::{DocumentSource, ValidationOutcome, ValidationRequest};
pub use pipeline::input::DocumentKind;
pub use pipeline::ocr::{OcrEngine, TesseractEngine};
pub use pipeline::render::{PdfRasterizer, PdfiumRasterizer};
pub use validate::{
    validate, validate_local, validate_local_sync, validate_remote, validate_remote_sync,
};
