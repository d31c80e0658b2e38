//! Image preprocessing before OCR: grayscale, then a linear contrast boost
//! around the image mean.
//!
//! The contrast step blends the image with a flat image of its own mean
//! luminance: `out = mean + factor * (v - mean)`, truncated and clamped to
//! `0..=255`. A factor of 1.0 leaves the image unchanged, 0.0 flattens it to
//! mean gray, and the default 2.0 pushes ink and paper further apart.

use image::{DynamicImage, GrayImage};
use tracing::debug;

/// Default contrast multiplier applied before OCR.
pub const DEFAULT_CONTRAST_FACTOR: f32 = 2.0;

/// Convert to single-channel luminance and boost contrast.
///
/// The grayscale step is `image`'s `to_luma8`, which weights RGB with the
/// Rec. 709 coefficients (0.2126, 0.7152, 0.0722). Converters that use
/// Rec. 601 (0.299, 0.587, 0.114) give different gray levels for saturated
/// colours, so pure red becomes 54 here rather than 76. Gray, black and white
/// inputs are identical under both.
pub fn preprocess(image: &DynamicImage, contrast_factor: f32) -> GrayImage {
    let gray = image.to_luma8();
    enhance_contrast(&gray, contrast_factor)
}

/// Linear contrast enhancement around the rounded mean luminance.
pub fn enhance_contrast(gray: &GrayImage, factor: f32) -> GrayImage {
    let mean = mean_luma(gray) as f32;
    debug!(mean, factor, "Enhancing contrast");

    let mut out = gray.clone();
    for pixel in out.pixels_mut() {
        let v = mean + factor * (pixel[0] as f32 - mean);
        pixel[0] = v.clamp(0.0, 255.0) as u8;
    }
    out
}

/// Mean luminance rounded to the nearest integer; 0 for an empty image.
pub fn mean_luma(gray: &GrayImage) -> u8 {
    let count = gray.as_raw().len() as u64;
    if count == 0 {
        return 0;
    }
    let sum: u64 = gray.as_raw().iter().map(|&v| v as u64).sum();
    ((sum + count / 2) / count) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb, RgbImage};

    fn gray_from(values: &[u8]) -> GrayImage {
        GrayImage::from_raw(values.len() as u32, 1, values.to_vec()).expect("buffer size")
    }

    #[test]
    fn mean_is_rounded() {
        assert_eq!(mean_luma(&gray_from(&[0, 255])), 128);
        assert_eq!(mean_luma(&gray_from(&[10, 11, 11])), 11);
        assert_eq!(mean_luma(&GrayImage::new(0, 0)), 0);
    }

    #[test]
    fn factor_one_is_identity() {
        let img = gray_from(&[0, 37, 128, 200, 255]);
        assert_eq!(enhance_contrast(&img, 1.0), img);
    }

    #[test]
    fn factor_two_pushes_away_from_mean_and_clamps() {
        // mean = round((100 + 120 + 140) / 3) = 120
        let img = gray_from(&[100, 120, 140]);
        let out = enhance_contrast(&img, 2.0);
        assert_eq!(out.as_raw(), &vec![80, 120, 160]);

        // mean = 128; 0 → -128 → 0, 255 → 382 → 255
        let img = gray_from(&[0, 255]);
        let out = enhance_contrast(&img, 2.0);
        assert_eq!(out.as_raw(), &vec![0, 255]);
    }

    #[test]
    fn factor_zero_flattens_to_mean() {
        let img = gray_from(&[0, 50, 100]);
        let out = enhance_contrast(&img, 0.0);
        assert!(out.pixels().all(|p| *p == Luma([50])));
    }

    #[test]
    fn preprocess_outputs_single_channel() {
        let rgb = RgbImage::from_pixel(4, 2, Rgb([255, 255, 255]));
        let out = preprocess(&DynamicImage::ImageRgb8(rgb), DEFAULT_CONTRAST_FACTOR);
        assert_eq!(out.dimensions(), (4, 2));
        assert!(out.pixels().all(|p| *p == Luma([255])));
    }

    #[test]
    fn grayscale_uses_rec709_weights() {
        let red = DynamicImage::ImageRgb8(RgbImage::from_pixel(1, 1, Rgb([255, 0, 0])));
        // A single pixel is its own mean, so contrast leaves it alone.
        assert_eq!(preprocess(&red, 2.0).as_raw(), &vec![54]);
    }
}
