//! Pure Rust image backend built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image::load_from_memory` |
//! | Resolution metadata | custom [`resolution`](super::resolution) reader |
//! | Alpha flattening | [`RasterImage::from_dynamic`] |
//! | Encode preview → JPEG | `image::codecs::jpeg::JpegEncoder` |

use super::backend::{BackendError, ImageBackend, Preview};
use super::params::Quality;
use super::raster::{AnalysisImage, RasterImage};
use super::resolution::read_resolution;
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageFormat};
use std::sync::LazyLock;

/// Extensions whose decoders are compiled in.
///
/// SVG is not listed: it is a vector format with no pixel grid to analyse.
const DESIGN_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("webp", ImageFormat::WebP),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    DESIGN_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the set of image file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

const PREVIEW_MIME: &str = "image/jpeg";

/// Backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageBackend for RustBackend {
    fn decode(&self, bytes: &[u8]) -> Result<RasterImage, BackendError> {
        let decoded =
            image::load_from_memory(bytes).map_err(|e| BackendError::Decode(e.to_string()))?;
        let resolution = read_resolution(bytes);
        tracing::debug!(
            width = decoded.width(),
            height = decoded.height(),
            color = ?decoded.color(),
            dpi_x = ?resolution.dpi_x,
            dpi_y = ?resolution.dpi_y,
            "decoded design"
        );
        Ok(RasterImage::from_dynamic(decoded).with_resolution(resolution))
    }

    fn encode_preview(
        &self,
        image: &AnalysisImage,
        quality: Quality,
    ) -> Result<Preview, BackendError> {
        let pixels = image.pixels();
        let mut bytes = Vec::new();
        JpegEncoder::new_with_quality(&mut bytes, quality.as_u8())
            .write_image(
                pixels.as_raw(),
                pixels.width(),
                pixels.height(),
                ExtendedColorType::Rgb8,
            )
            .map_err(|e| BackendError::Encode(e.to_string()))?;

        Ok(Preview {
            mime_type: PREVIEW_MIME,
            width: pixels.width(),
            height: pixels.height(),
            bytes,
        })
    }
}
