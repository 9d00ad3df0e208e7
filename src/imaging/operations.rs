//! High-level image operations.
//!
//! These functions combine calculations with pixel work or backend calls.

use super::backend::{BackendError, ImageBackend, Preview};
use super::calculations::calculate_analysis_dimensions;
use super::params::Quality;
use super::raster::{AnalysisImage, TrimmedImage};
use image::imageops::{self, FilterType};

/// Scale a trimmed design to the fixed analysis width, capped at `max_height`.
///
/// Nearest-neighbour sampling: every output pixel is a copy of one source
/// pixel, so no blended grey appears along ink edges to shift the coverage
/// count.
pub fn downsample_for_analysis(
    trimmed: &TrimmedImage,
    target_width: u32,
    max_height: u32,
) -> AnalysisImage {
    let (width, height) = calculate_analysis_dimensions(
        (trimmed.width(), trimmed.height()),
        target_width,
        max_height,
    );
    let pixels = imageops::resize(trimmed.pixels(), width, height, FilterType::Nearest);
    tracing::debug!(
        from_width = trimmed.width(),
        from_height = trimmed.height(),
        width,
        height,
        "downsampled for analysis"
    );
    AnalysisImage::new(pixels)
}

/// Encode the analysis image as the caller-facing preview.
pub fn create_preview(
    backend: &impl ImageBackend,
    analysis: &AnalysisImage,
    quality: Quality,
) -> Result<Preview, BackendError> {
    let preview = backend.encode_preview(analysis, quality)?;
    tracing::debug!(
        bytes = preview.bytes.len(),
        mime_type = preview.mime_type,
        "encoded preview"
    );
    Ok(preview)
}
