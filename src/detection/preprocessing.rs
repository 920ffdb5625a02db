use image::{Rgb, RgbaImage};
use imageproc::filter::separable_filter_equal;
use palette::{FromColor, Lab, Srgb};

use crate::models::{LabColor, LabImage};

/// Normalized 1-D Gaussian kernel of `size` taps
pub fn gaussian_kernel(size: u32, sigma: f32) -> Vec<f32> {
    let center = (size as f32 - 1.0) / 2.0;
    let weights: Vec<f32> = (0..size)
        .map(|i| {
            let d = i as f32 - center;
            (-(d * d) / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f32 = weights.iter().sum();
    weights.into_iter().map(|w| w / sum).collect()
}

/// Smooth sensor noise with a square Gaussian kernel
pub fn apply_blur(img: &RgbaImage, kernel_size: u32, sigma: f32) -> RgbaImage {
    separable_filter_equal(img, &gaussian_kernel(kernel_size, sigma))
}

/// Convert one sRGB color to 8-bit Lab (D65 white point), scaled as
/// `L * 255 / 100`, `a + 128`, `b + 128`.
pub fn rgb_to_lab(r: u8, g: u8, b: u8) -> LabColor {
    let lab: Lab = Lab::from_color(Srgb::new(r, g, b).into_format::<f32>());
    let to_byte = |v: f32| v.round().clamp(0.0, 255.0) as u8;
    [to_byte(lab.l * 255.0 / 100.0), to_byte(lab.a + 128.0), to_byte(lab.b + 128.0)]
}

/// Convert an RGBA frame to Lab, dropping alpha
pub fn to_lab(img: &RgbaImage) -> LabImage {
    let mut lab = LabImage::new(img.width(), img.height());
    for (src, dst) in img.pixels().zip(lab.pixels_mut()) {
        *dst = Rgb(rgb_to_lab(src[0], src[1], src[2]));
    }
    lab
}
