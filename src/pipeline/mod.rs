//! Pipeline stages for certificate validation.
//!
//! Each submodule implements exactly one step, so each can be tested on its
//! own and the external collaborators (OCR engine, PDF rasterizer) can be
//! swapped without touching the other stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ render ──▶ preprocess ──▶ ocr ──▶ check
//! (path/URL)  (pdfium/   (gray +       (engine)  (name +
//!              decode)    contrast)              keyword)
//! ```
//!
//! 1. [`input`]      — read a local file or download a URL; classify PDF vs image
//! 2. [`render`]     — first PDF page via the injected rasterizer, or decode the image
//! 3. [`preprocess`] — grayscale and linear contrast boost
//! 4. [`ocr`]        — recognise text with the injected [`ocr::OcrEngine`]
//! 5. [`check`]      — case-insensitive name and keyword containment

pub mod check;
pub mod input;
pub mod ocr;
pub mod preprocess;
pub mod render;
