//! The caller-facing estimate.

use super::dimensions::PhysicalSize;
use super::production::ProductionEstimate;
use super::stitches::StitchEstimate;
use crate::imaging::{Preview, TrimmedImage};
use serde::Serialize;

/// Round half away from zero to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Everything one estimate produces.
///
/// Serializes without the preview bytes; callers that want the image inline
/// use [`Preview::to_data_uri`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimationResult {
    pub width_cm: f64,
    pub height_cm: f64,
    pub area_cm2: f64,
    pub coverage_percent: f64,
    pub estimated_stitches: u64,
    pub production_minutes: f64,
    pub thread_meters: f64,
    pub price: f64,
    /// DPI used to convert pixels to centimetres.
    pub dpi: f64,
    /// Size of the trimmed design in source pixels.
    pub design_width_px: u32,
    pub design_height_px: u32,
    /// Stitches per square inch for the selected coverage tier.
    pub multiplier: f64,
    #[serde(skip)]
    pub preview: Preview,
}

/// Combine the stage outputs, applying display rounding.
pub fn assemble(
    design: &TrimmedImage,
    size: &PhysicalSize,
    coverage: f64,
    stitches: StitchEstimate,
    production: ProductionEstimate,
    preview: Preview,
) -> EstimationResult {
    EstimationResult {
        width_cm: round_to(size.width_cm, 2),
        height_cm: round_to(size.height_cm, 2),
        area_cm2: round_to(size.area_cm2, 2),
        coverage_percent: round_to(coverage * 100.0, 1),
        estimated_stitches: stitches.stitches,
        production_minutes: production.minutes,
        thread_meters: production.thread_meters,
        price: production.price,
        dpi: size.dpi,
        design_width_px: design.width(),
        design_height_px: design.height(),
        multiplier: stitches.multiplier,
        preview,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_to_places() {
        assert_eq!(round_to(25.4, 2), 25.4);
        assert_eq!(round_to(4.8825, 1), 4.9);
        assert_eq!(round_to(10.859, 2), 10.86);
        assert_eq!(round_to(0.0352778, 2), 0.04);
    }

    #[test]
    fn round_half_away_from_zero() {
        assert_eq!(round_to(312.5, 0), 313.0);
        assert_eq!(round_to(-2.5, 0), -3.0);
        assert_eq!(round_to(0.25, 1), 0.3);
    }

    #[test]
    fn serialized_result_omits_preview_bytes() {
        let result = EstimationResult {
            width_cm: 1.0,
            height_cm: 2.0,
            area_cm2: 2.0,
            coverage_percent: 50.0,
            estimated_stitches: 10,
            production_minutes: 0.0,
            thread_meters: 0.1,
            price: 5.02,
            dpi: 72.0,
            design_width_px: 28,
            design_height_px: 57,
            multiplier: 2000.0,
            preview: Preview {
                mime_type: "image/jpeg",
                width: 200,
                height: 400,
                bytes: vec![1, 2, 3],
            },
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["estimated_stitches"], 10);
        assert_eq!(json["price"], 5.02);
        assert!(json.get("preview").is_none());
    }
}
