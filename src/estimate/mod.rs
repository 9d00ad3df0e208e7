//! The estimation pipeline.
//!
//! ```text
//! RasterImage
//!   │ trim                 imaging::trim
//!   ▼
//! TrimmedImage ── resolve_dimensions ──▶ PhysicalSize
//!   │ downsample_for_analysis
//!   ▼
//! AnalysisImage ── coverage_fraction ──▶ coverage
//!   │                                       │ estimate_stitches
//!   │                                       ▼
//!   │                                   stitches ── calculate_production
//!   │ create_preview                                    │
//!   ▼                                                   ▼
//! Preview ──────────────── assemble ─────────────▶ EstimationResult
//! ```
//!
//! Each call is independent: the config is borrowed, the backend holds no
//! per-call state, and nothing is cached between calls. Configuration is
//! validated before any pixel is read.

pub mod coverage;
pub mod dimensions;
pub mod production;
pub mod result;
pub mod stitches;

pub use coverage::coverage_fraction;
pub use dimensions::{PhysicalSize, resolve_dimensions, resolve_dpi};
pub use production::{ProductionEstimate, calculate_production};
pub use result::{EstimationResult, assemble, round_to};
pub use stitches::{StitchEstimate, density_multiplier, estimate_stitches};

use crate::config::{ConfigError, EstimatorConfig};
use crate::imaging::{
    BackendError, ImageBackend, Quality, RasterImage, create_preview, downsample_for_analysis,
    trim,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EstimateError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("Invalid configuration: {0}")]
    Configuration(#[from] ConfigError),
    #[error("No design detected: {0}")]
    EmptyDesign(&'static str),
}

/// Estimate an already decoded image.
pub fn estimate(
    backend: &impl ImageBackend,
    raster: &RasterImage,
    config: &EstimatorConfig,
) -> Result<EstimationResult, EstimateError> {
    config.validate()?;
    run(backend, raster, config)
}

/// Decode encoded bytes with `backend`, then estimate.
pub fn estimate_bytes(
    backend: &impl ImageBackend,
    bytes: &[u8],
    config: &EstimatorConfig,
) -> Result<EstimationResult, EstimateError> {
    config.validate()?;
    let raster = backend.decode(bytes)?;
    run(backend, &raster, config)
}

fn run(
    backend: &impl ImageBackend,
    raster: &RasterImage,
    config: &EstimatorConfig,
) -> Result<EstimationResult, EstimateError> {
    let design = trim(raster, &config.trim)
        .ok_or(EstimateError::EmptyDesign("image is a uniform background"))?;

    let dpi = resolve_dpi(raster.resolution(), config.analysis.default_dpi);
    let size = resolve_dimensions(design.width(), design.height(), dpi)?;

    let analysis = downsample_for_analysis(
        &design,
        config.analysis.analysis_width,
        config.analysis.max_analysis_height,
    );
    let coverage = coverage_fraction(&analysis, config.analysis.coverage_threshold)?;

    let stitches = estimate_stitches(size.area_in2, coverage, &config.density);
    let production = calculate_production(stitches.stitches, &config.production)?;

    let preview = create_preview(backend, &analysis, Quality::new(config.preview.quality))?;

    let result = assemble(&design, &size, coverage, stitches, production, preview);
    tracing::info!(
        width_cm = result.width_cm,
        height_cm = result.height_cm,
        coverage_percent = result.coverage_percent,
        stitches = result.estimated_stitches,
        minutes = result.production_minutes,
        price = result.price,
        "estimate complete"
    );
    Ok(result)
}
