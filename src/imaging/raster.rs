//! Pixel grids passed between pipeline stages.
//!
//! Each stage produces a new value and never mutates its input:
//!
//! ```text
//! RasterImage ──trim──▶ TrimmedImage ──downsample──▶ AnalysisImage
//! ```
//!
//! All three wrap an 8-bit RGB buffer. Alpha is flattened onto white when a
//! [`RasterImage`] is built from a decoded image, so transparent padding reads
//! as background everywhere downstream.

use super::resolution::Resolution;
use super::trim::CropBox;
use image::{DynamicImage, Rgb, RgbImage};

/// A decoded design image plus the resolution metadata it carried.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    pixels: RgbImage,
    resolution: Resolution,
}

impl RasterImage {
    /// Wrap an RGB buffer with no resolution metadata.
    pub fn new(pixels: RgbImage) -> Self {
        Self {
            pixels,
            resolution: Resolution::default(),
        }
    }

    /// Build from any decoded image, compositing alpha over white.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        let pixels = if image.color().has_alpha() {
            flatten_onto_white(&image)
        } else {
            image.into_rgb8()
        };
        Self::new(pixels)
    }

    /// Attach resolution metadata.
    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    /// Shorthand for a known horizontal and vertical DPI.
    pub fn with_dpi(self, dpi_x: f64, dpi_y: f64) -> Self {
        self.with_resolution(Resolution {
            dpi_x: Some(dpi_x),
            dpi_y: Some(dpi_y),
        })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }
}

/// Composite an image with alpha over a white background.
fn flatten_onto_white(image: &DynamicImage) -> RgbImage {
    let rgba = image.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let a = a as u32;
        let blend = |c: u8| ((c as u32 * a + 255 * (255 - a) + 127) / 255) as u8;
        Rgb([blend(r), blend(g), blend(b)])
    })
}

/// The part of a [`RasterImage`] inside the design's bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct TrimmedImage {
    pixels: RgbImage,
    bounds: CropBox,
}

impl TrimmedImage {
    pub(crate) fn new(pixels: RgbImage, bounds: CropBox) -> Self {
        Self { pixels, bounds }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }

    /// Where the crop sits in the source image.
    pub fn bounds(&self) -> CropBox {
        self.bounds
    }
}

/// Fixed-width copy of a [`TrimmedImage`] used for coverage and preview only.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisImage {
    pixels: RgbImage,
}

impl AnalysisImage {
    pub(crate) fn new(pixels: RgbImage) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }

    pub fn pixel_count(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }
}
