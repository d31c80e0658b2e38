//! Error types for the edgequake-certcheck library.
//!
//! Every failure in the pipeline is a [`ValidationError`]. Stages return
//! `Result<_, ValidationError>` and propagate with `?`; only the top-level
//! `validate*` functions turn an error into a failed
//! [`crate::outcome::ValidationOutcome`], so callers never see an `Err`.
//!
//! Each variant maps to exactly one [`ErrorKind`] tag. The `Display` text of a
//! variant is the human-readable `reason` that ends up in the outcome.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// All errors produced while validating a certificate.
#[derive(Debug, Error)]
pub enum ValidationError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The local path does not resolve to an existing file.
    #[error("Certificate file not found.")]
    FileNotFound { path: PathBuf },

    /// The file exists but could not be read.
    #[error("Failed to read certificate file '{path}': {source}")]
    LoadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Transport error or non-success HTTP status.
    #[error("Failed to download certificate: {reason}")]
    DownloadFailed { url: String, reason: String },

    /// The single GET exceeded the configured timeout.
    #[error("Failed to download certificate: timed out after {secs}s")]
    DownloadTimeout { url: String, secs: u64 },

    // ── Document errors ───────────────────────────────────────────────────
    /// A PDF was supplied but no rasterizer is configured.
    #[error("PDF support not available (no PDF rasterizer configured).")]
    PdfSupportUnavailable,

    /// Rasterisation produced zero pages.
    #[error("Unable to read PDF pages.")]
    EmptyDocument,

    /// The rasterizer could not open or render the PDF.
    #[error("Unable to render PDF: {detail}")]
    PdfRenderFailed { detail: String },

    /// Raster image bytes could not be decoded.
    #[error("Unable to decode certificate image: {0}")]
    DecodeFailed(#[from] image::ImageError),

    // ── OCR errors ────────────────────────────────────────────────────────
    /// The OCR engine failed internally.
    #[error("Text extraction failed: {0}")]
    ExtractionFailed(String),

    // ── Validation failures ───────────────────────────────────────────────
    /// Text was extracted but the claimed name is absent.
    #[error("Name '{name}' not found.")]
    NameNotFound { name: String },

    /// The name is present but none of the qualifying keywords are.
    #[error("Required keywords not found.")]
    KeywordNotFound,

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error (runtime creation, panicked task, ...).
    #[error("An error occurred: {0}")]
    Internal(String),
}

impl ValidationError {
    /// The classification tag for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ValidationError::FileNotFound { .. } => ErrorKind::FileNotFound,
            ValidationError::LoadFailed { .. } => ErrorKind::LoadError,
            ValidationError::DownloadFailed { .. } | ValidationError::DownloadTimeout { .. } => {
                ErrorKind::DownloadFailed
            }
            ValidationError::PdfSupportUnavailable => ErrorKind::CapabilityUnavailable,
            ValidationError::EmptyDocument => ErrorKind::EmptyDocument,
            ValidationError::PdfRenderFailed { .. } | ValidationError::DecodeFailed(_) => {
                ErrorKind::DecodeError
            }
            ValidationError::ExtractionFailed(_) => ErrorKind::ExtractionError,
            ValidationError::NameNotFound { .. } => ErrorKind::NameNotFound,
            ValidationError::KeywordNotFound => ErrorKind::KeywordNotFound,
            ValidationError::InvalidConfig(_) | ValidationError::Internal(_) => {
                ErrorKind::UnknownError
            }
        }
    }
}

/// Stable classification of a failed validation.
///
/// Serialised in `snake_case` so it can travel in JSON responses next to the
/// free-text `reason`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    FileNotFound,
    LoadError,
    DownloadFailed,
    CapabilityUnavailable,
    EmptyDocument,
    DecodeError,
    ExtractionError,
    NameNotFound,
    KeywordNotFound,
    UnknownError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::FileNotFound => "file_not_found",
            ErrorKind::LoadError => "load_error",
            ErrorKind::DownloadFailed => "download_failed",
            ErrorKind::CapabilityUnavailable => "capability_unavailable",
            ErrorKind::EmptyDocument => "empty_document",
            ErrorKind::DecodeError => "decode_error",
            ErrorKind::ExtractionError => "extraction_error",
            ErrorKind::NameNotFound => "name_not_found",
            ErrorKind::KeywordNotFound => "keyword_not_found",
            ErrorKind::UnknownError => "unknown_error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
