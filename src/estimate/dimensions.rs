//! Physical size of a trimmed design.
//!
//! DPI policy: the mean of the horizontal and vertical resolution when both
//! are present and positive, otherwise the configured default (72).

use super::EstimateError;
use crate::imaging::Resolution;
use serde::Serialize;

pub const CM_PER_INCH: f64 = 2.54;
pub const CM2_PER_IN2: f64 = 6.4516;

/// Design size in physical units, unrounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhysicalSize {
    pub width_cm: f64,
    pub height_cm: f64,
    pub area_cm2: f64,
    pub area_in2: f64,
    /// The DPI the conversion used.
    pub dpi: f64,
}

/// Pick the DPI used for unit conversion.
pub fn resolve_dpi(resolution: Resolution, default_dpi: f64) -> f64 {
    let usable = |d: Option<f64>| d.filter(|v| v.is_finite() && *v > 0.0);
    match (usable(resolution.dpi_x), usable(resolution.dpi_y)) {
        (Some(x), Some(y)) => (x + y) / 2.0,
        _ => {
            if resolution.is_known() {
                tracing::warn!(
                    dpi_x = ?resolution.dpi_x,
                    dpi_y = ?resolution.dpi_y,
                    default_dpi,
                    "incomplete resolution metadata, using default DPI"
                );
            }
            default_dpi
        }
    }
}

/// Convert trimmed pixel dimensions to centimetres and square inches.
///
/// A zero-sized design is reported as [`EstimateError::EmptyDesign`] rather
/// than measured.
pub fn resolve_dimensions(
    width_px: u32,
    height_px: u32,
    dpi: f64,
) -> Result<PhysicalSize, EstimateError> {
    if width_px == 0 || height_px == 0 {
        return Err(EstimateError::EmptyDesign("design has zero width or height"));
    }
    let width_cm = (width_px as f64 / dpi) * CM_PER_INCH;
    let height_cm = (height_px as f64 / dpi) * CM_PER_INCH;
    let area_cm2 = width_cm * height_cm;

    Ok(PhysicalSize {
        width_cm,
        height_cm,
        area_cm2,
        area_in2: area_cm2 / CM2_PER_IN2,
        dpi,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    // =========================================================================
    // resolve_dpi
    // =========================================================================

    #[test]
    fn dpi_defaults_when_absent() {
        assert_eq!(resolve_dpi(Resolution::default(), 72.0), 72.0);
    }

    #[test]
    fn dpi_is_mean_of_axes() {
        let res = Resolution {
            dpi_x: Some(300.0),
            dpi_y: Some(200.0),
        };
        assert_eq!(resolve_dpi(res, 72.0), 250.0);
    }

    #[test]
    fn dpi_defaults_when_one_axis_missing() {
        let res = Resolution {
            dpi_x: Some(300.0),
            dpi_y: None,
        };
        assert_eq!(resolve_dpi(res, 72.0), 72.0);
    }

    #[test]
    fn dpi_defaults_when_non_positive() {
        let res = Resolution {
            dpi_x: Some(0.0),
            dpi_y: Some(300.0),
        };
        assert_eq!(resolve_dpi(res, 96.0), 96.0);
    }

    // =========================================================================
    // resolve_dimensions
    // =========================================================================

    #[test]
    fn ten_inches_at_72_dpi() {
        let size = resolve_dimensions(720, 720, 72.0).unwrap();
        assert!(close(size.width_cm, 25.4));
        assert!(close(size.height_cm, 25.4));
        assert!(close(size.area_cm2, 645.16));
        assert!(close(size.area_in2, 100.0));
    }

    #[test]
    fn area_in2_matches_inch_math() {
        // 300x150 px at 150 dpi = 2in x 1in
        let size = resolve_dimensions(300, 150, 150.0).unwrap();
        assert!(close(size.area_in2, 2.0));
        assert!(close(size.width_cm, 5.08));
    }

    #[test]
    fn single_pixel_is_tiny_but_defined() {
        let size = resolve_dimensions(1, 1, 72.0).unwrap();
        assert!(close(size.width_cm, 2.54 / 72.0));
        assert!(size.area_in2 > 0.0 && size.area_in2 < 0.001);
    }

    #[test]
    fn zero_width_is_empty_design() {
        assert!(matches!(
            resolve_dimensions(0, 10, 72.0),
            Err(EstimateError::EmptyDesign(_))
        ));
        assert!(matches!(
            resolve_dimensions(10, 0, 72.0),
            Err(EstimateError::EmptyDesign(_))
        ));
    }
}
