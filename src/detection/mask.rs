use image::{GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::filter::median_filter;
use imageproc::morphology::close;

use crate::config::DetectorConfig;
use crate::detection::calibration::Thresholds;
use crate::models::{ColorBound, LabImage};

/// Classify every pixel against one inclusive bound (255 inside, 0 outside)
pub fn in_range(lab: &LabImage, bound: &ColorBound) -> GrayImage {
    let mut out = GrayImage::new(lab.width(), lab.height());
    for (src, dst) in lab.pixels().zip(out.pixels_mut()) {
        if bound.contains(&src.0) {
            *dst = Luma([255]);
        }
    }
    out
}

/// Union of the per-bound masks, accumulated with saturating addition
pub fn union_in_range(lab: &LabImage, bounds: &[ColorBound]) -> GrayImage {
    let mut acc = GrayImage::new(lab.width(), lab.height());
    for bound in bounds {
        let mask = in_range(lab, bound);
        for (a, m) in acc.pixels_mut().zip(mask.pixels()) {
            a[0] = a[0].saturating_add(m[0]);
        }
    }
    acc
}

/// Median filter with an odd square kernel
pub fn median(mask: &GrayImage, kernel: u32) -> GrayImage {
    let radius = kernel / 2;
    median_filter(mask, radius, radius)
}

/// Pixels matching any sampled hand color, smoothed and closed
pub fn hand_mask(lab: &LabImage, bounds: &[ColorBound], config: &DetectorConfig) -> GrayImage {
    let raw = union_in_range(lab, bounds);
    let smoothed = median(&raw, config.hand_median);
    let k = (config.hand_close / 2).min(u8::MAX as u32) as u8;
    close(&smoothed, Norm::LInf, k)
}

/// Pixels matching none of the sampled background colors
pub fn background_absence_mask(
    lab: &LabImage,
    bounds: &[ColorBound],
    config: &DetectorConfig,
) -> GrayImage {
    let mut raw = union_in_range(lab, bounds);
    image::imageops::invert(&mut raw);
    median(&raw, config.background_median)
}

/// Binary hand mask: hand-color evidence AND absence of background color.
///
/// Always the size of `lab`, every pixel either 0 or 255.
pub fn build_mask(lab: &LabImage, thresholds: &Thresholds, config: &DetectorConfig) -> GrayImage {
    let hand = hand_mask(lab, &thresholds.hand, config);
    let background = background_absence_mask(lab, &thresholds.background, config);

    let mut out = hand;
    for (o, b) in out.pixels_mut().zip(background.pixels()) {
        o[0] &= b[0];
    }
    out
}
