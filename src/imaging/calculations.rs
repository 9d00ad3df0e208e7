//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Calculate the analysis image size for a design.
///
/// The width is `target_width` and the height keeps the source aspect ratio,
/// rounded to the nearest pixel. A height over `max_height` is clamped to it
/// and the width shrinks in proportion. Neither side drops below 1.
///
/// # Arguments
/// * `source` - Trimmed design dimensions (width, height), width non-zero
/// * `target_width` - Fixed analysis width
/// * `max_height` - Largest analysis height
///
/// # Examples
/// ```
/// # use stitch_estimate::imaging::calculate_analysis_dimensions;
/// // 400x300 landscape → 200x150
/// assert_eq!(calculate_analysis_dimensions((400, 300), 200, 1000), (200, 150));
///
/// // 1000x1 sliver → height clamps to 1
/// assert_eq!(calculate_analysis_dimensions((1000, 1), 200, 1000), (200, 1));
///
/// // 2x1000 stroke → capped at 1000 tall, width follows
/// assert_eq!(calculate_analysis_dimensions((2, 1000), 200, 1000), (2, 1000));
/// ```
pub fn calculate_analysis_dimensions(
    source: (u32, u32),
    target_width: u32,
    max_height: u32,
) -> (u32, u32) {
    let (src_w, src_h) = (source.0 as f64, source.1 as f64);
    let height = (src_h * target_width as f64 / src_w).round().max(1.0);
    if height <= max_height as f64 {
        return (target_width, height as u32);
    }
    let width = (src_w * max_height as f64 / src_h)
        .round()
        .clamp(1.0, target_width as f64);
    (width as u32, max_height)
}
