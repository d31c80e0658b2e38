//! Text extraction through an OCR engine.
//!
//! The engine is a trait object so deployments (and tests) can plug in any
//! recogniser. The default [`TesseractEngine`] shells out to the `tesseract`
//! binary with its default settings.

use crate::error::ValidationError;
use image::{GrayImage, ImageFormat};
use std::path::PathBuf;
use std::process::Command;
use std::time::Instant;
use tracing::{debug, info};

/// Recognises text in a single-channel image.
pub trait OcrEngine: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Recognise all text in `image`. An empty string is a valid result.
    fn recognize(&self, image: &GrayImage) -> Result<String, ValidationError>;
}

/// Run `engine` on a preprocessed image, logging duration and text size.
pub fn extract_text(engine: &dyn OcrEngine, image: &GrayImage) -> Result<String, ValidationError> {
    let start = Instant::now();
    let text = engine.recognize(image)?;
    info!(
        "{} extracted {} chars from {}x{} px in {}ms",
        engine.name(),
        text.chars().count(),
        image.width(),
        image.height(),
        start.elapsed().as_millis()
    );
    Ok(text)
}

/// Tesseract OCR via the command-line binary.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    command: PathBuf,
    language: Option<String>,
}

impl TesseractEngine {
    /// Use `tesseract` from `PATH` with its default language.
    pub fn new() -> Self {
        Self {
            command: PathBuf::from("tesseract"),
            language: None,
        }
    }

    /// Use a specific tesseract executable.
    pub fn with_command(mut self, command: impl Into<PathBuf>) -> Self {
        self.command = command.into();
        self
    }

    /// Pass `-l <language>` (e.g. "eng", "eng+fra").
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Whether the configured binary can be found.
    pub fn is_available(&self) -> bool {
        which::which(&self.command).is_ok()
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrEngine for TesseractEngine {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn recognize(&self, image: &GrayImage) -> Result<String, ValidationError> {
        let input = tempfile::Builder::new()
            .prefix("certcheck-")
            .suffix(".png")
            .tempfile()
            .map_err(|e| ValidationError::Internal(format!("tempfile: {e}")))?;

        image
            .save_with_format(input.path(), ImageFormat::Png)
            .map_err(|e| ValidationError::ExtractionFailed(format!("writing OCR input: {e}")))?;

        let mut cmd = Command::new(&self.command);
        cmd.arg(input.path()).arg("stdout");
        if let Some(ref lang) = self.language {
            cmd.arg("-l").arg(lang);
        }
        debug!("Running {:?}", cmd);

        let output = match cmd.output() {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ValidationError::ExtractionFailed(format!(
                    "tesseract not found at '{}' (install tesseract-ocr)",
                    self.command.display()
                )));
            }
            Err(e) => return Err(ValidationError::ExtractionFailed(e.to_string())),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ValidationError::ExtractionFailed(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    struct Echo(&'static str);

    impl OcrEngine for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn recognize(&self, _image: &GrayImage) -> Result<String, ValidationError> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn extract_text_returns_engine_output_verbatim() {
        let img = GrayImage::from_pixel(2, 2, Luma([255]));
        let text = extract_text(&Echo("  Jane DOE\n\u{c}"), &img).expect("ocr");
        assert_eq!(text, "  Jane DOE\n\u{c}");
    }

    #[test]
    fn missing_binary_is_extraction_error() {
        let engine = TesseractEngine::new().with_command("/nonexistent/bin/tesseract-certcheck");
        assert!(!engine.is_available());

        let img = GrayImage::from_pixel(2, 2, Luma([255]));
        let err = engine.recognize(&img).expect_err("should fail");
        assert!(matches!(err, ValidationError::ExtractionFailed(_)));
        assert!(err.to_string().contains("tesseract not found"), "got: {err}");
    }
}
