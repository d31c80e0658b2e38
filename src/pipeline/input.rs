//! Input loading: read a local certificate or download it from a URL, and
//! classify it as PDF or raster image.
//!
//! ## Classification
//!
//! Remote documents are treated as PDF when either the `Content-Type` header
//! mentions `pdf` or the URL path ends in `.pdf`. Local files are classified by
//! extension. No magic-byte sniffing is done, so a mislabelled response served
//! from a non-`.pdf` URL is handed to the image decoder and fails there.

use crate::error::ValidationError;
use crate::outcome::DocumentSource;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// What the loaded bytes are believed to contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    Pdf,
    Image,
}

/// Raw document bytes plus their classification.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub bytes: Vec<u8>,
    pub kind: DocumentKind,
    /// The path or URL the bytes came from, for logging.
    pub origin: String,
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Load a document from either source.
pub async fn load(
    source: &DocumentSource,
    timeout_secs: u64,
) -> Result<LoadedDocument, ValidationError> {
    match source {
        DocumentSource::LocalPath(path) => load_local(path).await,
        DocumentSource::RemoteUrl(url) => download_url(url, timeout_secs).await,
    }
}

/// Read a local file. Missing paths and non-files are `FileNotFound`; every
/// other I/O failure is `LoadFailed`.
pub async fn load_local(path: &Path) -> Result<LoadedDocument, ValidationError> {
    let meta = tokio::fs::metadata(path)
        .await
        .map_err(|e| io_error(path, e))?;
    if !meta.is_file() {
        return Err(ValidationError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let bytes = tokio::fs::read(path).await.map_err(|e| io_error(path, e))?;

    let kind = if has_pdf_suffix(&path.to_string_lossy()) {
        DocumentKind::Pdf
    } else {
        DocumentKind::Image
    };

    debug!(path = %path.display(), bytes = bytes.len(), ?kind, "Loaded local certificate");
    Ok(LoadedDocument {
        bytes,
        kind,
        origin: path.display().to_string(),
    })
}

/// `NotFound` means the path is missing; anything else (permissions, I/O)
/// means it exists but cannot be read.
fn io_error(path: &Path, e: std::io::Error) -> ValidationError {
    if e.kind() == std::io::ErrorKind::NotFound {
        ValidationError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        ValidationError::LoadFailed {
            path: path.to_path_buf(),
            source: e,
        }
    }
}

/// Download a URL with one GET and the given timeout.
pub async fn download_url(url: &str, timeout_secs: u64) -> Result<LoadedDocument, ValidationError> {
    info!("Downloading certificate from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ValidationError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| transport_error(url, timeout_secs, e))?;

    if !response.status().is_success() {
        return Err(ValidationError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let bytes = response
        .bytes()
        .await
        .map_err(|e| transport_error(url, timeout_secs, e))?;

    let kind = classify(content_type.as_deref(), url);
    info!(
        "Downloaded {} bytes (content-type: {}, kind: {:?})",
        bytes.len(),
        content_type.as_deref().unwrap_or("<none>"),
        kind
    );

    Ok(LoadedDocument {
        bytes: bytes.to_vec(),
        kind,
        origin: url.to_string(),
    })
}

fn transport_error(url: &str, timeout_secs: u64, e: reqwest::Error) -> ValidationError {
    if e.is_timeout() {
        ValidationError::DownloadTimeout {
            url: url.to_string(),
            secs: timeout_secs,
        }
    } else {
        ValidationError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        }
    }
}

/// Classify a remote document from its declared content type and its URL.
///
/// Either signal is enough to treat the document as a PDF.
pub fn classify(content_type: Option<&str>, url: &str) -> DocumentKind {
    let declared_pdf = content_type
        .map(|ct| ct.to_ascii_lowercase().contains("pdf"))
        .unwrap_or(false);

    if declared_pdf || has_pdf_suffix(&url_path(url)) {
        DocumentKind::Pdf
    } else {
        DocumentKind::Image
    }
}

/// The path component of a URL, without query or fragment. Falls back to the
/// raw string when it does not parse.
fn url_path(url: &str) -> String {
    reqwest::Url::parse(url)
        .map(|parsed| parsed.path().to_string())
        .unwrap_or_else(|_| url.to_string())
}

fn has_pdf_suffix(s: &str) -> bool {
    s.to_ascii_lowercase().ends_with(".pdf")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/cert.pdf"));
        assert!(is_url("http://example.com/cert.png"));
        assert!(!is_url("/tmp/cert.png"));
        assert!(!is_url("cert.png"));
        assert!(!is_url(""));
    }

    #[test]
    fn classify_by_content_type() {
        assert_eq!(
            classify(Some("application/pdf"), "https://cdn.example.com/raw/abc123"),
            DocumentKind::Pdf
        );
        assert_eq!(
            classify(Some("Application/PDF; charset=binary"), "https://x.test/a"),
            DocumentKind::Pdf
        );
    }

    #[test]
    fn classify_by_url_suffix() {
        assert_eq!(
            classify(Some("application/octet-stream"), "https://x.test/certs/Cert.PDF"),
            DocumentKind::Pdf
        );
        assert_eq!(
            classify(None, "https://x.test/certs/cert.pdf?sig=abc&v=2"),
            DocumentKind::Pdf
        );
    }

    #[test]
    fn classify_image() {
        assert_eq!(
            classify(Some("image/png"), "https://x.test/certs/cert.png"),
            DocumentKind::Image
        );
        assert_eq!(classify(None, "https://x.test/raw/abc"), DocumentKind::Image);
    }

    #[test]
    fn query_string_pdf_is_not_a_path_suffix() {
        assert_eq!(
            classify(Some("image/jpeg"), "https://x.test/view?file=cert.pdf"),
            DocumentKind::Image
        );
    }

    #[tokio::test]
    async fn missing_local_file_is_file_not_found() {
        let err = load_local(Path::new("/definitely/not/here/cert.png"))
            .await
            .expect_err("should fail");
        assert!(matches!(err, ValidationError::FileNotFound { .. }));
        assert_eq!(err.to_string(), "Certificate file not found.");
    }

    #[tokio::test]
    async fn directory_is_file_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = load_local(dir.path()).await.expect_err("should fail");
        assert!(matches!(err, ValidationError::FileNotFound { .. }));
    }

    #[test]
    fn io_errors_other_than_not_found_are_load_failures() {
        let path = Path::new("/srv/certs/cert.png");
        let missing = io_error(path, std::io::Error::from(std::io::ErrorKind::NotFound));
        assert_eq!(missing.kind(), ErrorKind::FileNotFound);

        let denied = io_error(
            path,
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(denied, ValidationError::LoadFailed { .. }));
        assert_eq!(denied.kind(), ErrorKind::LoadError);
        assert!(
            denied.to_string().starts_with("Failed to read certificate file '/srv/certs/cert.png'"),
            "got: {denied}"
        );
    }

    /// Root ignores permission bits, so these return early when the
    /// "unreadable" fixture turns out to be readable.
    #[cfg(unix)]
    #[tokio::test]
    async fn unreadable_file_is_load_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cert.png");
        std::fs::write(&path, b"png bytes").expect("write");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o000)).expect("chmod");
        if std::fs::read(&path).is_ok() {
            return;
        }

        let err = load_local(&path).await.expect_err("should fail");
        assert!(matches!(err, ValidationError::LoadFailed { .. }), "got: {err:?}");
        assert_eq!(err.kind(), ErrorKind::LoadError);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn unsearchable_parent_dir_is_load_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let locked = dir.path().join("locked");
        std::fs::create_dir(&locked).expect("mkdir");
        let path = locked.join("cert.png");
        std::fs::write(&path, b"png bytes").expect("write");
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).expect("chmod");
        let readable = std::fs::metadata(&path).is_ok();

        let result = load_local(&path).await;
        // Restore so the tempdir can be cleaned up.
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).expect("chmod");
        if readable {
            return;
        }

        let err = result.expect_err("should fail");
        assert!(matches!(err, ValidationError::LoadFailed { .. }), "got: {err:?}");
        assert_eq!(err.kind(), ErrorKind::LoadError);
    }

    #[tokio::test]
    async fn local_pdf_classified_by_extension() {
        let dir = tempfile::tempdir().expect("tempdir");
        let pdf = dir.path().join("Cert.PDF");
        std::fs::write(&pdf, b"%PDF-1.4\n").expect("write");
        let doc = load_local(&pdf).await.expect("load");
        assert_eq!(doc.kind, DocumentKind::Pdf);
        assert_eq!(doc.bytes, b"%PDF-1.4\n");

        let png = dir.path().join("cert.png");
        std::fs::write(&png, b"not really a png").expect("write");
        let doc = load_local(&png).await.expect("load");
        assert_eq!(doc.kind, DocumentKind::Image);
    }
}
