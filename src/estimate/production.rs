//! Machine time, thread usage and price for a stitch count.

use super::result::round_to;
use crate::config::{ConfigError, EstimationConfig};
use serde::Serialize;

/// Metres of thread consumed per 1000 stitches.
pub const THREAD_METERS_PER_THOUSAND: f64 = 6.0;

/// Production figures, already rounded for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProductionEstimate {
    /// Machine run time, 1 decimal.
    pub minutes: f64,
    /// Thread length in metres, 1 decimal.
    pub thread_meters: f64,
    /// Job price, 2 decimals.
    pub price: f64,
}

/// Derive time, thread and price from a stitch count.
///
/// The rates are validated first, so a zero machine speed is a
/// [`ConfigError`] rather than an infinite run time.
pub fn calculate_production(
    stitches: u64,
    config: &EstimationConfig,
) -> Result<ProductionEstimate, ConfigError> {
    config.validate()?;
    let stitches = stitches as f64;
    let thousands = stitches / 1000.0;

    Ok(ProductionEstimate {
        minutes: round_to(stitches / config.machine_speed, 1),
        thread_meters: round_to(thousands * THREAD_METERS_PER_THOUSAND, 1),
        price: round_to(config.base_fee + thousands * config.price_per_thousand, 2),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_million_stitches_at_defaults() {
        let production = calculate_production(250_000, &EstimationConfig::default()).unwrap();
        assert_eq!(production.minutes, 312.5);
        assert_eq!(production.thread_meters, 1500.0);
        assert_eq!(production.price, 380.0);
    }

    #[test]
    fn small_job_rounding() {
        // 3906 / 800 = 4.8825, 3.906 × 6 = 23.436, 5 + 3.906 × 1.5 = 10.859
        let production = calculate_production(3906, &EstimationConfig::default()).unwrap();
        assert_eq!(production.minutes, 4.9);
        assert_eq!(production.thread_meters, 23.4);
        assert_eq!(production.price, 10.86);
    }

    #[test]
    fn zero_stitches_costs_base_fee() {
        let production = calculate_production(0, &EstimationConfig::default()).unwrap();
        assert_eq!(production.minutes, 0.0);
        assert_eq!(production.thread_meters, 0.0);
        assert_eq!(production.price, 5.0);
    }

    #[test]
    fn custom_rates() {
        let config = EstimationConfig {
            machine_speed: 1000.0,
            price_per_thousand: 2.0,
            base_fee: 0.0,
        };
        let production = calculate_production(12_000, &config).unwrap();
        assert_eq!(production.minutes, 12.0);
        assert_eq!(production.price, 24.0);
    }

    #[test]
    fn zero_speed_is_config_error() {
        let config = EstimationConfig {
            machine_speed: 0.0,
            ..EstimationConfig::default()
        };
        assert!(matches!(
            calculate_production(100, &config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn negative_price_is_config_error() {
        let config = EstimationConfig {
            price_per_thousand: -1.0,
            ..EstimationConfig::default()
        };
        assert!(calculate_production(100, &config).is_err());
    }
}
