//! Background trimming: crop a design to the bounding box of its ink.
//!
//! The rule, with both constants taken from [`TrimConfig`]:
//!
//! 1. The background reference is the most common of the four corner colours
//!    (ties go to top-left, then top-right, bottom-left, bottom-right).
//! 2. A pixel is background when no channel differs from the reference by
//!    more than `tolerance`.
//! 3. The first and last rows and columns holding a non-background pixel bound
//!    the crop.
//! 4. When every pixel matches the reference the image is uniform. A light
//!    reference (every channel at least `min_background_channel`) is blank
//!    paper and [`trim`] returns `None`. Anything darker is solid artwork and
//!    the whole image is kept.

use super::raster::{RasterImage, TrimmedImage};
use crate::config::TrimConfig;
use image::{Rgb, RgbImage};
use serde::Serialize;

/// A rectangle in source-image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CropBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Most common corner colour, or `None` for an empty image.
pub fn corner_reference(img: &RgbImage) -> Option<Rgb<u8>> {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return None;
    }
    let corners = [
        *img.get_pixel(0, 0),
        *img.get_pixel(w - 1, 0),
        *img.get_pixel(0, h - 1),
        *img.get_pixel(w - 1, h - 1),
    ];

    let mut best = corners[0];
    let mut best_count = 0;
    for candidate in corners {
        let count = corners.iter().filter(|&&c| c == candidate).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    Some(best)
}

fn within_tolerance(pixel: &Rgb<u8>, reference: &Rgb<u8>, tolerance: u8) -> bool {
    pixel
        .0
        .iter()
        .zip(reference.0.iter())
        .all(|(&p, &r)| p.abs_diff(r) <= tolerance)
}

/// Bounding box of all pixels that differ from the corner reference.
///
/// A uniform image yields the full box when its colour is dark, and `None`
/// when it is light enough to be blank paper.
pub fn find_design_bounds(img: &RgbImage, config: &TrimConfig) -> Option<CropBox> {
    let (w, h) = img.dimensions();
    let reference = corner_reference(img)?;

    let is_ink = |x: u32, y: u32| {
        !within_tolerance(img.get_pixel(x, y), &reference, config.tolerance)
    };
    let row_has_ink = |y: u32| (0..w).any(|x| is_ink(x, y));

    let Some(top) = (0..h).find(|&y| row_has_ink(y)) else {
        let light = reference.0.iter().all(|&c| c >= config.min_background_channel);
        return (!light).then_some(CropBox {
            x: 0,
            y: 0,
            width: w,
            height: h,
        });
    };
    let bottom = (top..h).rev().find(|&y| row_has_ink(y))?;

    let col_has_ink = |x: u32| (top..=bottom).any(|y| is_ink(x, y));
    let left = (0..w).find(|&x| col_has_ink(x))?;
    let right = (left..w).rev().find(|&x| col_has_ink(x))?;

    Some(CropBox {
        x: left,
        y: top,
        width: right - left + 1,
        height: bottom - top + 1,
    })
}

/// Crop a raster to its design. `None` means no design was detected.
pub fn trim(raster: &RasterImage, config: &TrimConfig) -> Option<TrimmedImage> {
    let Some(bounds) = find_design_bounds(raster.pixels(), config) else {
        tracing::debug!(
            width = raster.width(),
            height = raster.height(),
            "no pixels differ from the background"
        );
        return None;
    };

    tracing::debug!(
        x = bounds.x,
        y = bounds.y,
        width = bounds.width,
        height = bounds.height,
        "trimmed background"
    );

    let pixels = image::imageops::crop_imm(
        raster.pixels(),
        bounds.x,
        bounds.y,
        bounds.width,
        bounds.height,
    )
    .to_image();
    Some(TrimmedImage::new(pixels, bounds))
}
