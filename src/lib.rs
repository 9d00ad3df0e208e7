//! # Stitch Estimate
//!
//! Instant embroidery quotes from a design image. Given an uploaded raster
//! design, the estimator reports its physical size, how much of it is ink, an
//! approximate stitch count, and the machine time, thread and price that stitch
//! count implies.
//!
//! # Architecture: One Pure Pipeline
//!
//! ```text
//! bytes ─decode─▶ RasterImage ─trim─▶ TrimmedImage ─downsample─▶ AnalysisImage
//!                                         │                           │
//!                                  physical size                coverage, preview
//!                                         └──────── stitches ─────────┘
//!                                                      │
//!                                        minutes, thread, price
//! ```
//!
//! Everything between decoding and preview encoding is pixel arithmetic with
//! no I/O, so every stage is unit tested on synthetic images built in memory.
//! Codec work sits behind the [`imaging::ImageBackend`] trait.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`estimate`] | The pipeline: dimensions, coverage, stitches, production, result |
//! | [`imaging`] | Decoding, resolution metadata, trimming, downsampling, preview encoding |
//! | [`config`] | `stitch-estimate.toml` loading, merging over stock defaults, validation |
//! | [`intake`] | Upload checks (extension, size) before any bytes reach the decoder |
//! | [`output`] | CLI report formatting (text and JSON) and user-facing error hints |
//!
//! # Design Decisions
//!
//! ## Coverage Is a Proxy
//!
//! Stitch count depends on fill type, underlay and digitizing choices that a
//! flat image does not show. The estimator counts pixels darker than
//! near-white and scales a per-tier density by that fraction. This is accurate
//! enough for a quote on dark artwork over a light background, and wrong in
//! predictable ways elsewhere (pale tints under-count, dark backgrounds
//! over-count).
//!
//! ## Nearest-Neighbour Analysis Image
//!
//! The design is scaled to a fixed 200 px width before counting, or to a
//! 1000 px height when that width would make it taller. Nearest sampling
//! copies source pixels instead of blending them, so the ink fraction of the
//! analysis image tracks the source and repeated runs give identical results.
//!
//! ## Every Constant Is Configuration
//!
//! Machine rates, tier boundaries, density multipliers, the ink threshold and
//! the trim tolerance all live in [`config::EstimatorConfig`] with the
//! historical values as defaults. A shop with a faster machine or a different
//! price list edits one TOML file.

pub mod config;
pub mod estimate;
pub mod imaging;
pub mod intake;
pub mod output;

pub use estimate::{EstimateError, EstimationResult, estimate, estimate_bytes};

#[cfg(test)]
pub(crate) mod test_helpers;
