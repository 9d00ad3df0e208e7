//! Stitch count from area and coverage.
//!
//! The density multiplier is a step function of coverage with inclusive
//! lower bounds:
//!
//! | Coverage | Stitches per in² |
//! |---|---|
//! | `< medium_from` (0.20) | `light` (1500) |
//! | `< heavy_from` (0.60) | `medium` (2000) |
//! | otherwise | `heavy` (2500) |

use crate::config::DensityConfig;
use serde::Serialize;

/// Stitch count together with the multiplier that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StitchEstimate {
    pub stitches: u64,
    pub multiplier: f64,
}

/// Stitches per square inch for a coverage fraction.
pub fn density_multiplier(coverage: f64, density: &DensityConfig) -> f64 {
    if coverage < density.medium_from {
        density.light
    } else if coverage < density.heavy_from {
        density.medium
    } else {
        density.heavy
    }
}

/// `round(area_in2 × coverage × multiplier)`, never negative.
pub fn estimate_stitches(area_in2: f64, coverage: f64, density: &DensityConfig) -> StitchEstimate {
    let multiplier = density_multiplier(coverage, density);
    let raw = (area_in2 * coverage * multiplier).round();
    // `as` saturates: negatives and NaN become 0
    let stitches = raw.max(0.0) as u64;
    tracing::debug!(area_in2, coverage, multiplier, stitches, "estimated stitches");
    StitchEstimate {
        stitches,
        multiplier,
    }
}
