//! CLI output formatting.
//!
//! # Text report
//!
//! ```text
//! logo.png
//!     Design: 300 × 300 px at 72 dpi
//!     Size: 10.58 × 10.58 cm (111.99 cm²)
//!     Coverage: 15.0% (1,500 stitches/in²)
//!
//! Estimate
//!     Stitches: 3,906
//!     Machine time: 4.9 min
//!     Thread: 23.4 m
//!     Price: 10.86
//!
//! Preview → preview.jpg
//! ```
//!
//! # JSON report
//!
//! The [`EstimationResult`] fields, plus a `preview` data URI when requested.
//!
//! # Architecture
//!
//! Each report has a `format_*` function (returns `Vec<String>` or `String`)
//! for testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::estimate::{EstimateError, EstimationResult};
use crate::imaging::BackendError;
use serde::Serialize;
use std::path::Path;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Group digits in threes: `250000` → `250,000`.
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format a multiplier without a trailing `.0` when it is whole.
fn format_rate(rate: f64) -> String {
    if rate.fract() == 0.0 && rate >= 0.0 && rate < u64::MAX as f64 {
        group_thousands(rate as u64)
    } else {
        format!("{rate}")
    }
}

// ============================================================================
// Text report
// ============================================================================

pub fn format_estimate(
    result: &EstimationResult,
    source: &Path,
    preview_path: Option<&Path>,
) -> Vec<String> {
    let mut lines = vec![source.display().to_string()];
    lines.push(format!(
        "{}Design: {} × {} px at {} dpi",
        indent(1),
        result.design_width_px,
        result.design_height_px,
        result.dpi
    ));
    lines.push(format!(
        "{}Size: {:.2} × {:.2} cm ({:.2} cm²)",
        indent(1),
        result.width_cm,
        result.height_cm,
        result.area_cm2
    ));
    lines.push(format!(
        "{}Coverage: {:.1}% ({} stitches/in²)",
        indent(1),
        result.coverage_percent,
        format_rate(result.multiplier)
    ));

    lines.push(String::new());
    lines.push("Estimate".to_string());
    lines.push(format!(
        "{}Stitches: {}",
        indent(1),
        group_thousands(result.estimated_stitches)
    ));
    lines.push(format!(
        "{}Machine time: {:.1} min",
        indent(1),
        result.production_minutes
    ));
    lines.push(format!("{}Thread: {:.1} m", indent(1), result.thread_meters));
    lines.push(format!("{}Price: {:.2}", indent(1), result.price));

    if let Some(path) = preview_path {
        lines.push(String::new());
        lines.push(format!("Preview → {}", path.display()));
    }
    lines
}

pub fn print_estimate(result: &EstimationResult, source: &Path, preview_path: Option<&Path>) {
    for line in format_estimate(result, source, preview_path) {
        println!("{}", line);
    }
}

// ============================================================================
// JSON report
// ============================================================================

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    result: &'a EstimationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    preview: Option<String>,
}

/// Pretty-printed JSON, with the preview inlined as a data URI if asked.
pub fn format_json(
    result: &EstimationResult,
    embed_preview: bool,
) -> Result<String, serde_json::Error> {
    let report = JsonReport {
        result,
        preview: embed_preview.then(|| result.preview.to_data_uri()),
    };
    serde_json::to_string_pretty(&report)
}

pub fn print_json(result: &EstimationResult, embed_preview: bool) -> Result<(), serde_json::Error> {
    println!("{}", format_json(result, embed_preview)?);
    Ok(())
}

// ============================================================================
// Errors
// ============================================================================

/// User-facing advice for an estimate failure.
pub fn error_hint(err: &EstimateError) -> &'static str {
    match err {
        EstimateError::EmptyDesign(_) => {
            "No design was found. Upload artwork on a plain light background."
        }
        EstimateError::Backend(BackendError::Decode(_)) => {
            "The file could not be read as an image. Please upload a clearer image (PNG or JPEG)."
        }
        EstimateError::Backend(BackendError::Encode(_)) => {
            "The preview could not be created. Try saving the design as PNG and uploading again."
        }
        EstimateError::Configuration(_) => {
            "Check the config file and rate flags. `stitch-estimate check-config` shows the resolved values."
        }
    }
}
