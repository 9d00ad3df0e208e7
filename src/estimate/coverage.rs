//! Ink coverage of the analysis image.
//!
//! A pixel is ink when the unweighted mean of its channels is below the
//! threshold (250 by default), i.e. anything that is not near-pure white.
//! This is a proxy for stitch density, not a measurement of it: it assumes
//! dark or mid-tone artwork on a light background. Pale tints read as
//! background, and a dark background reads as solid ink.

use super::EstimateError;
use crate::imaging::AnalysisImage;
use image::Rgb;

/// Unweighted mean of the three channels.
pub fn luminance(pixel: &Rgb<u8>) -> f64 {
    let [r, g, b] = pixel.0;
    (r as u32 + g as u32 + b as u32) as f64 / 3.0
}

/// Fraction of pixels classified as ink, in `[0, 1]`.
///
/// An image with no pixels has no defined coverage and is reported as
/// [`EstimateError::EmptyDesign`].
pub fn coverage_fraction(image: &AnalysisImage, threshold: f64) -> Result<f64, EstimateError> {
    let total = image.pixel_count();
    if total == 0 {
        return Err(EstimateError::EmptyDesign("analysis image has no pixels"));
    }
    let covered = image
        .pixels()
        .pixels()
        .filter(|p| luminance(p) < threshold)
        .count() as u64;

    let coverage = covered as f64 / total as f64;
    tracing::debug!(covered, total, coverage, "measured coverage");
    Ok(coverage)
}
