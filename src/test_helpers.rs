//! Shared test utilities: synthetic design images.
//!
//! Designs are built from solid canvases with rectangles painted on top, so
//! expected bounding boxes and coverage fractions can be computed by hand.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let img = paint(white(400, 400), (100, 50, 40, 20), BLACK);
//! let raster = raster(img);
//! ```

use crate::imaging::RasterImage;
use image::{Rgb, RgbImage};

pub const BLACK: [u8; 3] = [0, 0, 0];
pub const WHITE: [u8; 3] = [255, 255, 255];

// =========================================================================
// Canvases
// =========================================================================

/// Uniform canvas of the given colour.
pub fn solid(width: u32, height: u32, color: [u8; 3]) -> RgbImage {
    RgbImage::from_pixel(width, height, Rgb(color))
}

/// Uniform white canvas.
pub fn white(width: u32, height: u32) -> RgbImage {
    solid(width, height, WHITE)
}

/// Paint a filled rectangle `(x, y, width, height)` onto a canvas.
/// Parts outside the canvas are ignored.
pub fn paint(mut img: RgbImage, rect: (u32, u32, u32, u32), color: [u8; 3]) -> RgbImage {
    let (x0, y0, w, h) = rect;
    for y in y0..(y0 + h).min(img.height()) {
        for x in x0..(x0 + w).min(img.width()) {
            img.put_pixel(x, y, Rgb(color));
        }
    }
    img
}

/// 300×300 design with a 15% ink band on a white canvas.
///
/// Rows 1-45 are ink across the full width. Two single ink pixels in column 1
/// touch the top and bottom edges, so the design fills the canvas while all
/// four corners stay white. Scaling 300 → 200 never samples column 1, which
/// leaves exactly 30 of 200 analysis rows as ink.
pub fn fifteen_percent_design() -> RgbImage {
    let img = paint(white(300, 300), (0, 1, 300, 45), BLACK);
    let img = paint(img, (1, 0, 1, 1), BLACK);
    paint(img, (1, 299, 1, 1), BLACK)
}

// =========================================================================
// Rasters
// =========================================================================

/// Wrap a canvas with no DPI metadata.
pub fn raster(img: RgbImage) -> RasterImage {
    RasterImage::new(img)
}

/// Wrap a canvas with the same DPI on both axes.
pub fn raster_at(img: RgbImage, dpi: f64) -> RasterImage {
    RasterImage::new(img).with_dpi(dpi, dpi)
}

/// Count pixels matching a colour.
pub fn count_color(img: &RgbImage, color: [u8; 3]) -> usize {
    img.pixels().filter(|p| p.0 == color).count()
}
