//! Estimator configuration.
//!
//! Handles loading, validating, and merging the estimator's TOML config file.
//! Stock defaults are the base layer; a user file (default
//! `stitch-estimate.toml` in the working directory) overrides them, and CLI
//! flags are layered on top of that as a final overlay.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [production]
//! machine_speed = 800.0        # stitches per minute
//! price_per_thousand = 1.5     # price per 1000 stitches
//! base_fee = 5.0               # flat fee added to every job
//!
//! [analysis]
//! default_dpi = 72.0           # used when the image has no usable DPI
//! analysis_width = 200         # coverage/preview image width in pixels
//! max_analysis_height = 1000   # tall designs are scaled down to fit
//! coverage_threshold = 250.0   # mean luminance below this counts as ink
//!
//! [density]
//! medium_from = 0.2            # coverage where the medium tier starts
//! heavy_from = 0.6             # coverage where the heavy tier starts
//! light = 1500.0               # stitches per in² per unit of coverage
//! medium = 2000.0
//! heavy = 2500.0
//!
//! [trim]
//! tolerance = 10               # max per-channel distance from the background
//! min_background_channel = 240 # uniform images darker than this are artwork
//!
//! [preview]
//! quality = 80                 # JPEG quality (1-100)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [production]
//! machine_speed = 1000.0
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Config file looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "stitch-estimate.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Complete estimator configuration.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EstimatorConfig {
    /// Machine speed and pricing.
    pub production: EstimationConfig,
    /// Resolution fallback, analysis image size, ink threshold.
    pub analysis: AnalysisConfig,
    /// Coverage tiers and their stitch density multipliers.
    pub density: DensityConfig,
    /// Background trimming rule.
    pub trim: TrimConfig,
    /// Preview encoding.
    pub preview: PreviewConfig,
}

impl EstimatorConfig {
    /// Validate every section. Called before any pixel is touched.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.production.validate()?;
        self.analysis.validate()?;
        self.density.validate()?;
        if self.preview.quality == 0 || self.preview.quality > 100 {
            return Err(ConfigError::Validation(
                "preview.quality must be 1-100".into(),
            ));
        }
        Ok(())
    }
}

/// Per-job production rates supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EstimationConfig {
    /// Machine speed in stitches per minute. Must be positive.
    pub machine_speed: f64,
    /// Price charged per 1000 stitches.
    pub price_per_thousand: f64,
    /// Flat fee added to every job.
    pub base_fee: f64,
}

impl Default for EstimationConfig {
    fn default() -> Self {
        Self {
            machine_speed: 800.0,
            price_per_thousand: 1.5,
            base_fee: 5.0,
        }
    }
}

impl EstimationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.machine_speed.is_finite() && self.machine_speed > 0.0) {
            return Err(ConfigError::Validation(format!(
                "production.machine_speed must be positive, got {}",
                self.machine_speed
            )));
        }
        if !(self.price_per_thousand.is_finite() && self.price_per_thousand >= 0.0) {
            return Err(ConfigError::Validation(format!(
                "production.price_per_thousand must not be negative, got {}",
                self.price_per_thousand
            )));
        }
        if !(self.base_fee.is_finite() && self.base_fee >= 0.0) {
            return Err(ConfigError::Validation(format!(
                "production.base_fee must not be negative, got {}",
                self.base_fee
            )));
        }
        Ok(())
    }
}

/// Largest side the JPEG preview encoder accepts.
const MAX_ENCODED_SIDE: u32 = 65535;

/// Image analysis settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Resolution assumed when the image carries no usable DPI metadata.
    pub default_dpi: f64,
    /// Width of the downsampled image used for coverage and preview.
    pub analysis_width: u32,
    /// Height limit for the analysis image. Designs taller than
    /// `analysis_width` allows are scaled down on both axes to fit.
    pub max_analysis_height: u32,
    /// Mean channel value below which a pixel counts as ink.
    pub coverage_threshold: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            default_dpi: 72.0,
            analysis_width: 200,
            max_analysis_height: 1000,
            coverage_threshold: 250.0,
        }
    }
}

impl AnalysisConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.default_dpi.is_finite() && self.default_dpi > 0.0) {
            return Err(ConfigError::Validation(
                "analysis.default_dpi must be positive".into(),
            ));
        }
        if !(1..=MAX_ENCODED_SIDE).contains(&self.analysis_width) {
            return Err(ConfigError::Validation(format!(
                "analysis.analysis_width must be within 1-{MAX_ENCODED_SIDE}"
            )));
        }
        if !(1..=MAX_ENCODED_SIDE).contains(&self.max_analysis_height) {
            return Err(ConfigError::Validation(format!(
                "analysis.max_analysis_height must be within 1-{MAX_ENCODED_SIDE}"
            )));
        }
        if !(0.0..=256.0).contains(&self.coverage_threshold) {
            return Err(ConfigError::Validation(
                "analysis.coverage_threshold must be within 0-256".into(),
            ));
        }
        Ok(())
    }
}

/// Coverage tiers. A tier's lower bound is inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DensityConfig {
    /// Coverage at which the medium tier starts.
    pub medium_from: f64,
    /// Coverage at which the heavy tier starts.
    pub heavy_from: f64,
    /// Multiplier below `medium_from`.
    pub light: f64,
    /// Multiplier from `medium_from` up to `heavy_from`.
    pub medium: f64,
    /// Multiplier from `heavy_from` up.
    pub heavy: f64,
}

impl Default for DensityConfig {
    fn default() -> Self {
        Self {
            medium_from: 0.20,
            heavy_from: 0.60,
            light: 1500.0,
            medium: 2000.0,
            heavy: 2500.0,
        }
    }
}

impl DensityConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let ordered = 0.0 <= self.medium_from
            && self.medium_from <= self.heavy_from
            && self.heavy_from <= 1.0;
        if !ordered {
            return Err(ConfigError::Validation(
                "density tiers must satisfy 0 <= medium_from <= heavy_from <= 1".into(),
            ));
        }
        for (name, value) in [
            ("light", self.light),
            ("medium", self.medium),
            ("heavy", self.heavy),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Validation(format!(
                    "density.{name} must not be negative"
                )));
            }
        }
        Ok(())
    }
}

/// Background trimming rule. See [`crate::imaging::trim`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrimConfig {
    /// Largest per-channel difference from the background colour that still
    /// counts as background.
    pub tolerance: u8,
    /// A uniform image is blank paper only when every channel reaches this
    /// value. Darker uniform images are kept whole as solid artwork.
    pub min_background_channel: u8,
}

impl Default for TrimConfig {
    fn default() -> Self {
        Self {
            tolerance: 10,
            min_background_channel: 240,
        }
    }
}

/// Preview encoding settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreviewConfig {
    /// JPEG quality (1-100).
    pub quality: u32,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self { quality: 80 }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(EstimatorConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge optional overlays onto a base value in order, then deserialize and
/// validate.
pub fn resolve_config(
    base: toml::Value,
    overlays: impl IntoIterator<Item = toml::Value>,
) -> Result<EstimatorConfig, ConfigError> {
    let merged = overlays.into_iter().fold(base, merge_toml);
    let config: EstimatorConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from a TOML file on top of the stock defaults.
///
/// A missing file is not an error: the stock defaults are returned.
pub fn load_config(path: &Path) -> Result<EstimatorConfig, ConfigError> {
    let overlay = load_raw_config(path)?;
    resolve_config(stock_defaults_value(), overlay)
}

/// Returns a fully-commented stock config file with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# stitch-estimate configuration
# =============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Production rates
# ---------------------------------------------------------------------------
[production]
# Embroidery machine speed in stitches per minute. Must be positive.
machine_speed = 800.0

# Price per 1000 stitches.
price_per_thousand = 1.5

# Flat fee added to every job.
base_fee = 5.0

# ---------------------------------------------------------------------------
# Image analysis
# ---------------------------------------------------------------------------
[analysis]
# Resolution assumed when the image carries no usable DPI metadata.
default_dpi = 72.0

# Width in pixels of the downsampled copy used for coverage and preview.
analysis_width = 200

# Height limit of that copy. Tall, narrow designs are scaled down on both axes
# so the coverage scan never exceeds analysis_width x max_analysis_height.
max_analysis_height = 1000

# A pixel counts as ink when the mean of its R, G and B values is below this.
# Coverage is a proxy that assumes dark artwork on a light background.
coverage_threshold = 250.0

# ---------------------------------------------------------------------------
# Stitch density tiers
# ---------------------------------------------------------------------------
[density]
# Coverage where the medium and heavy tiers start (inclusive).
medium_from = 0.2
heavy_from = 0.6

# Stitches per square inch per unit of coverage, per tier.
light = 1500.0
medium = 2000.0
heavy = 2500.0

# ---------------------------------------------------------------------------
# Background trimming
# ---------------------------------------------------------------------------
[trim]
# Largest per-channel difference from the corner colour still treated as
# background.
tolerance = 10

# An image with no pixel off the corner colour is blank paper when every
# channel reaches this value. Darker uniform images are kept whole.
min_background_channel = 240

# ---------------------------------------------------------------------------
# Preview
# ---------------------------------------------------------------------------
[preview]
# JPEG quality of the preview image (1-100).
quality = 80
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(content: &str) -> (TempDir, std::path::PathBuf) {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, content).unwrap();
        (tmp, path)
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("missing.toml")).unwrap();
        assert_eq!(config, EstimatorConfig::default());
        assert_eq!(config.production.machine_speed, 800.0);
        assert_eq!(config.production.price_per_thousand, 1.5);
        assert_eq!(config.production.base_fee, 5.0);
    }

    #[test]
    fn load_config_reads_file() {
        let (_tmp, path) = write_config(
            r#"
[production]
machine_speed = 1000.0
base_fee = 12.5
"#,
        );

        let config = load_config(&path).unwrap();
        assert_eq!(config.production.machine_speed, 1000.0);
        assert_eq!(config.production.base_fee, 12.5);
        // Unspecified values should be defaults
        assert_eq!(config.production.price_per_thousand, 1.5);
        assert_eq!(config.analysis.analysis_width, 200);
    }

    #[test]
    fn load_config_accepts_integer_rates() {
        let (_tmp, path) = write_config("[production]\nmachine_speed = 650\n");
        let config = load_config(&path).unwrap();
        assert_eq!(config.production.machine_speed, 650.0);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let (_tmp, path) = write_config("this is not valid toml [[[");
        let result = load_config(&path);
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_validates_values() {
        let (_tmp, path) = write_config("[production]\nmachine_speed = 0.0\n");
        let result = load_config(&path);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // Unknown keys
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let (_tmp, path) = write_config("[production]\nmachine_sped = 900.0\n");
        assert!(matches!(load_config(&path), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_section_rejected() {
        let (_tmp, path) = write_config("[stitches]\ncount = 3\n");
        assert!(matches!(load_config(&path), Err(ConfigError::Toml(_))));
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        EstimatorConfig::default().validate().unwrap();
    }

    #[test]
    fn validate_negative_machine_speed() {
        let mut config = EstimatorConfig::default();
        config.production.machine_speed = -5.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_nan_machine_speed() {
        let mut config = EstimatorConfig::default();
        config.production.machine_speed = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_negative_price() {
        let mut config = EstimatorConfig::default();
        config.production.price_per_thousand = -0.01;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_negative_base_fee() {
        let mut config = EstimatorConfig::default();
        config.production.base_fee = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_zero_price_and_fee_ok() {
        let mut config = EstimatorConfig::default();
        config.production.price_per_thousand = 0.0;
        config.production.base_fee = 0.0;
        config.validate().unwrap();
    }

    #[test]
    fn validate_zero_analysis_width() {
        let mut config = EstimatorConfig::default();
        config.analysis.analysis_width = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_analysis_height_bounds() {
        let mut config = EstimatorConfig::default();
        config.analysis.max_analysis_height = 0;
        assert!(config.validate().is_err());
        config.analysis.max_analysis_height = 70_000;
        assert!(config.validate().is_err());
        config.analysis.max_analysis_height = 65_535;
        config.validate().unwrap();
    }

    #[test]
    fn validate_tiers_out_of_order() {
        let mut config = EstimatorConfig::default();
        config.density.medium_from = 0.7;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_preview_quality_bounds() {
        let mut config = EstimatorConfig::default();
        config.preview.quality = 0;
        assert!(config.validate().is_err());
        config.preview.quality = 100;
        config.validate().unwrap();
        config.preview.quality = 101;
        assert!(config.validate().is_err());
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("a = 1").unwrap();
        let overlay: toml::Value = toml::from_str("a = 2").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("a").unwrap().as_integer(), Some(2));
    }

    #[test]
    fn merge_toml_preserves_base_keys() {
        let base: toml::Value =
            toml::from_str("[production]\nbase_fee = 5.0\nmachine_speed = 800.0").unwrap();
        let overlay: toml::Value = toml::from_str("[production]\nbase_fee = 9.0").unwrap();
        let merged = merge_toml(base, overlay);
        let production = merged.get("production").unwrap();
        assert_eq!(production.get("base_fee").unwrap().as_float(), Some(9.0));
        assert_eq!(production.get("machine_speed").unwrap().as_float(), Some(800.0));
    }

    #[test]
    fn resolve_config_applies_overlays_in_order() {
        let file: toml::Value = toml::from_str("[production]\nmachine_speed = 900.0").unwrap();
        let flags: toml::Value = toml::from_str("[production]\nmachine_speed = 1200.0").unwrap();
        let config = resolve_config(stock_defaults_value(), [file, flags]).unwrap();
        assert_eq!(config.production.machine_speed, 1200.0);
    }

    #[test]
    fn resolve_config_with_no_overlay() {
        let config = resolve_config(stock_defaults_value(), None::<toml::Value>).unwrap();
        assert_eq!(config, EstimatorConfig::default());
    }

    // =========================================================================
    // Stock config
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let value: toml::Value = toml::from_str(stock_config_toml()).unwrap();
        let config = resolve_config(stock_defaults_value(), Some(value)).unwrap();
        assert_eq!(config, EstimatorConfig::default());
    }

    #[test]
    fn stock_config_toml_contains_all_sections() {
        let content = stock_config_toml();
        for section in ["[production]", "[analysis]", "[density]", "[trim]", "[preview]"] {
            assert!(content.contains(section), "missing {section}");
        }
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let value = stock_defaults_value();
        for section in ["production", "analysis", "density", "trim", "preview"] {
            assert!(value.get(section).is_some(), "missing {section}");
        }
    }
}
