use image::{DynamicImage, GrayImage, Luma};
use imageproc::contrast::equalize_histogram;
use imageproc::edges::canny;
use imageproc::filter::separable_filter_equal;

use crate::config::{CannyParameters, GaussianParameters};

/// Images produced by the preprocessing stage
#[derive(Debug, Clone)]
pub struct Preprocessed {
    pub blurred: GrayImage,
    /// Diagnostic only, nothing downstream reads it
    pub equalized: GrayImage,
    pub edges: GrayImage,
}

/// Convert image to grayscale
pub fn to_grayscale(img: &DynamicImage) -> GrayImage {
    img.to_luma8()
}

/// 1-D Gaussian weights for an odd kernel size.
///
/// Non-positive sigma falls back to the fixed small kernels for sizes up to 7
/// and to `0.3 * ((k - 1) * 0.5 - 1) + 0.8` beyond that.
pub fn gaussian_kernel(kernel_size: u32, sigma: f32) -> Vec<f32> {
    if sigma <= 0.0 {
        match kernel_size {
            1 => return vec![1.0],
            3 => return vec![0.25, 0.5, 0.25],
            5 => return vec![0.0625, 0.25, 0.375, 0.25, 0.0625],
            7 => {
                return vec![
                    0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125,
                ];
            }
            _ => {}
        }
    }

    let sigma = if sigma > 0.0 {
        sigma
    } else {
        0.3 * ((kernel_size as f32 - 1.0) * 0.5 - 1.0) + 0.8
    };

    let center = (kernel_size / 2) as f32;
    let scale = -0.5 / (sigma * sigma);
    let weights: Vec<f32> = (0..kernel_size)
        .map(|i| {
            let x = i as f32 - center;
            (scale * x * x).exp()
        })
        .collect();
    let sum: f32 = weights.iter().sum();

    weights.into_iter().map(|w| w / sum).collect()
}

/// Apply Gaussian blur with an explicit kernel size
pub fn apply_blur(img: &GrayImage, params: &GaussianParameters) -> GrayImage {
    let kernel = gaussian_kernel(params.kernel_size, params.sigma);
    if kernel.len() == 1 {
        return img.clone();
    }
    separable_filter_equal(img, &kernel)
}

/// Spread intensities over the full range
pub fn equalize(img: &GrayImage) -> GrayImage {
    equalize_histogram(img)
}

/// Lowest hysteresis threshold handed to `canny`.
///
/// imageproc's edge following walks off the image border when the low
/// threshold admits suppressed (0.0) pixels, so a configured 0 becomes this.
pub const MIN_CANNY_LOW: f32 = 1e-3;

/// Detect edges using Canny edge detector
pub fn detect_edges(img: &GrayImage, params: &CannyParameters) -> GrayImage {
    let low = params.low_threshold.max(MIN_CANNY_LOW);
    canny(img, low, params.high_threshold.max(low))
}

/// Bilinear resize sampling at pixel centres with clamped borders.
///
/// Unlike `imageops::resize` with `FilterType::Triangle`, the support does not
/// widen when shrinking, so each output pixel blends at most four inputs.
pub fn resize_bilinear(img: &GrayImage, width: u32, height: u32) -> GrayImage {
    let (src_w, src_h) = img.dimensions();
    if (src_w, src_h) == (width, height) {
        return img.clone();
    }
    if src_w == 0 || src_h == 0 {
        return GrayImage::new(width, height);
    }

    let scale_x = src_w as f32 / width as f32;
    let scale_y = src_h as f32 / height as f32;

    let sample = |dst: u32, scale: f32, len: u32| -> (u32, u32, f32) {
        let pos = ((dst as f32 + 0.5) * scale - 0.5).clamp(0.0, (len - 1) as f32);
        let lo = pos.floor() as u32;
        (lo, (lo + 1).min(len - 1), pos - lo as f32)
    };

    GrayImage::from_fn(width, height, |x, y| {
        let (x0, x1, ax) = sample(x, scale_x, src_w);
        let (y0, y1, ay) = sample(y, scale_y, src_h);
        let px = |x, y| img.get_pixel(x, y)[0] as f32;

        let top = px(x0, y0) * (1.0 - ax) + px(x1, y0) * ax;
        let bottom = px(x0, y1) * (1.0 - ax) + px(x1, y1) * ax;
        let value = top * (1.0 - ay) + bottom * ay;
        Luma([value.round().clamp(0.0, 255.0) as u8])
    })
}

/// Blur, equalize and edge-detect a grayscale frame
pub fn preprocess(
    gray: &GrayImage,
    gaussian: &GaussianParameters,
    canny_params: &CannyParameters,
) -> Preprocessed {
    let blurred = apply_blur(gray, gaussian);
    let equalized = equalize(&blurred);
    let edges = detect_edges(&blurred, canny_params);

    Preprocessed {
        blurred,
        equalized,
        edges,
    }
}
