//! Image handling in pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::load_from_memory` |
//! | **DPI metadata** | custom reader (JFIF, EXIF, PNG `pHYs`, TIFF) |
//! | **Trim** | corner-reference bounding box scan |
//! | **Downsample** | `image::imageops::resize` with `FilterType::Nearest` |
//! | **Preview** | `image::codecs::jpeg::JpegEncoder` |
//!
//! The module is split into:
//! - **Raster**: the image types passed between stages
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Trim**: background detection and cropping
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: Functions combining calculations with pixel work or the backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod raster;
pub mod resolution;
pub mod rust_backend;
pub mod trim;

pub use backend::{BackendError, ImageBackend, Preview};
pub use calculations::calculate_analysis_dimensions;
pub use operations::{create_preview, downsample_for_analysis};
pub use params::Quality;
pub use raster::{AnalysisImage, RasterImage, TrimmedImage};
pub use resolution::{Resolution, read_resolution};
pub use rust_backend::{RustBackend, supported_input_extensions};
pub use trim::{CropBox, trim};
