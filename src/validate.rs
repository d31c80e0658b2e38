//! Validation entry points.
//!
//! Every function here returns a [`ValidationOutcome`], never an error: stage
//! failures are classified into a failed outcome at this boundary. The
//! outcome's `text` is the verbatim OCR output whenever OCR ran.

use crate::config::ValidatorConfig;
use crate::error::ValidationError;
use crate::outcome::{DocumentSource, ValidationOutcome, ValidationRequest};
use crate::pipeline::input::LoadedDocument;
use crate::pipeline::{check, input, ocr, preprocess, render};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Validate a certificate stored on the local filesystem.
///
/// # Example
/// ```rust,no_run
/// use edgequake_certcheck::{validate_local, ValidatorConfig};
///
/// # #[tokio::main]
/// # async fn main() {
/// let config = ValidatorConfig::default();
/// let outcome = validate_local("Jane Doe", "uploads/certificate.png", &config).await;
/// println!("{}: {}", outcome.success, outcome.reason);
/// # }
/// ```
pub async fn validate_local(
    claimed_name: &str,
    local_path: impl AsRef<Path>,
    config: &ValidatorConfig,
) -> ValidationOutcome {
    let request = ValidationRequest::new(
        claimed_name,
        DocumentSource::LocalPath(local_path.as_ref().to_path_buf()),
    );
    validate(&request, config).await
}

/// Validate a certificate hosted at an HTTP(S) URL.
///
/// Performs exactly one GET with `config.download_timeout_secs`.
pub async fn validate_remote(
    claimed_name: &str,
    document_url: &str,
    config: &ValidatorConfig,
) -> ValidationOutcome {
    let request = ValidationRequest::new(
        claimed_name,
        DocumentSource::RemoteUrl(document_url.to_string()),
    );
    validate(&request, config).await
}

/// Run the full pipeline for one request.
pub async fn validate(request: &ValidationRequest, config: &ValidatorConfig) -> ValidationOutcome {
    let start = Instant::now();
    debug!(claimed_name = %request.claimed_name, source = ?request.source, "Starting validation");

    let outcome = match extract(&request.source, config).await {
        Ok(text) => {
            debug!(text = %text, "Extracted text");
            match check::check_text(&text, &request.claimed_name, &config.keywords) {
                Ok(()) => ValidationOutcome::passed(text),
                Err(e) => ValidationOutcome::failed(&e, text),
            }
        }
        Err(e) => {
            warn!("Validation aborted before text check: {}", e);
            ValidationOutcome::failed(&e, String::new())
        }
    };

    info!(
        success = outcome.success,
        kind = outcome.kind.map(|k| k.as_str()).unwrap_or("none"),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Validation finished: {}",
        outcome.reason
    );
    outcome
}

/// Synchronous wrapper around [`validate_local`].
///
/// Creates a temporary tokio runtime internally; do not call from inside an
/// async context.
pub fn validate_local_sync(
    claimed_name: &str,
    local_path: impl AsRef<Path>,
    config: &ValidatorConfig,
) -> ValidationOutcome {
    block_on(validate_local(claimed_name, local_path, config))
}

/// Synchronous wrapper around [`validate_remote`].
///
/// Creates a temporary tokio runtime internally; do not call from inside an
/// async context.
pub fn validate_remote_sync(
    claimed_name: &str,
    document_url: &str,
    config: &ValidatorConfig,
) -> ValidationOutcome {
    block_on(validate_remote(claimed_name, document_url, config))
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn block_on<F>(fut: F) -> ValidationOutcome
where
    F: std::future::Future<Output = ValidationOutcome>,
{
    match tokio::runtime::Runtime::new() {
        Ok(rt) => rt.block_on(fut),
        Err(e) => {
            let err = ValidationError::Internal(format!("Failed to create tokio runtime: {e}"));
            ValidationOutcome::failed(&err, String::new())
        }
    }
}

/// Load, rasterise, preprocess and OCR a document.
async fn extract(source: &DocumentSource, config: &ValidatorConfig) -> Result<String, ValidationError> {
    // ── Step 1: Load bytes ───────────────────────────────────────────────
    let doc = input::load(source, config.download_timeout_secs).await?;

    // ── Steps 2–4: blocking work off the async workers ───────────────────
    let config = config.clone();
    tokio::task::spawn_blocking(move || extract_blocking(&doc, &config))
        .await
        .map_err(|e| ValidationError::Internal(format!("OCR task panicked: {e}")))?
}

fn extract_blocking(doc: &LoadedDocument, config: &ValidatorConfig) -> Result<String, ValidationError> {
    let image = render::rasterize(doc, config.pdf_rasterizer.as_deref(), config.pdf_dpi)?;
    let gray = preprocess::preprocess(&image, config.contrast_factor);
    ocr::extract_text(config.ocr_engine.as_ref(), &gray)
}
