//! Request and outcome types.
//!
//! A [`ValidationOutcome`] is the only thing a validation call returns. Its
//! `text` field always carries the verbatim OCR output when OCR ran, even on
//! failure, so a reviewer can audit false negatives.

use crate::error::{ErrorKind, ValidationError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the certificate document comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentSource {
    /// A file on the local filesystem.
    LocalPath(PathBuf),
    /// An HTTP(S) URL fetched with a single GET.
    RemoteUrl(String),
}

impl DocumentSource {
    /// Interpret a user-supplied string: `http://` / `https://` prefixes are
    /// URLs, everything else is a local path.
    pub fn from_input(input: &str) -> Self {
        if crate::pipeline::input::is_url(input) {
            DocumentSource::RemoteUrl(input.to_string())
        } else {
            DocumentSource::LocalPath(PathBuf::from(input))
        }
    }
}

/// A single validation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRequest {
    /// The full name the claimant entered.
    pub claimed_name: String,
    pub source: DocumentSource,
}

impl ValidationRequest {
    pub fn new(claimed_name: impl Into<String>, source: DocumentSource) -> Self {
        Self {
            claimed_name: claimed_name.into(),
            source,
        }
    }
}

/// Result of a validation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub success: bool,
    /// Human-readable explanation, populated on success and failure.
    pub reason: String,
    /// Verbatim extracted text, or empty if the pipeline failed before OCR.
    pub text: String,
    /// Failure classification; `None` on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
}

impl ValidationOutcome {
    pub const SUCCESS_REASON: &'static str = "Validation successful.";

    /// A passing outcome carrying the extracted text.
    pub fn passed(text: String) -> Self {
        Self {
            success: true,
            reason: Self::SUCCESS_REASON.to_string(),
            text,
            kind: None,
        }
    }

    /// A failing outcome. `text` is empty when OCR never ran.
    pub fn failed(error: &ValidationError, text: String) -> Self {
        Self {
            success: false,
            reason: error.to_string(),
            text,
            kind: Some(error.kind()),
        }
    }
}
