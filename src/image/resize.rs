// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/sgpcore

//! Separable Lanczos-4 resampling.
//!
//! Fixed 8-tap interpolation (window a = 4) on each axis, matching the
//! resampler the protocol was tuned against. The kernel is evaluated with
//! [`det_math`](crate::det_math) so resampled pixels are identical across
//! platforms. Accumulation is f64 per tap set; edges clamp to the nearest
//! source pixel.

use crate::det_math::det_sin;
use crate::image::{ImageError, RgbImage};

const A: i64 = 4;

/// Lanczos-4 kernel: sinc(x) · sinc(x / 4) for |x| < 4, else 0.
fn lanczos4(x: f64) -> f64 {
    if x == 0.0 {
        return 1.0;
    }
    let ax = x.abs();
    if ax >= A as f64 {
        return 0.0;
    }
    let px = std::f64::consts::PI * x;
    (A as f64) * det_sin(px) * det_sin(px / A as f64) / (px * px)
}

/// One output position: first source tap index and 8 normalized weights.
struct Taps {
    start: i64,
    weights: [f64; 8],
}

fn build_taps(src_len: usize, dst_len: usize) -> Vec<Taps> {
    let scale = src_len as f64 / dst_len as f64;
    (0..dst_len)
        .map(|i| {
            let center = (i as f64 + 0.5) * scale - 0.5;
            let start = center.floor() as i64 - (A - 1);
            let mut weights = [0f64; 8];
            let mut sum = 0.0;
            for (k, w) in weights.iter_mut().enumerate() {
                *w = lanczos4(center - (start + k as i64) as f64);
                sum += *w;
            }
            for w in weights.iter_mut() {
                *w /= sum;
            }
            Taps { start, weights }
        })
        .collect()
}

#[inline]
fn clamp_index(i: i64, len: usize) -> usize {
    i.clamp(0, len as i64 - 1) as usize
}

/// Resample an RGB image to (dst_w, dst_h) with Lanczos-4 interpolation.
pub fn resize_lanczos4(
    img: &RgbImage,
    dst_w: usize,
    dst_h: usize,
) -> Result<RgbImage, ImageError> {
    if dst_w == 0 || dst_h == 0 {
        return Err(ImageError::EmptyDimensions);
    }
    let (src_w, src_h) = (img.width(), img.height());
    if dst_w == src_w && dst_h == src_h {
        return Ok(img.clone());
    }

    let h_taps = build_taps(src_w, dst_w);
    let v_taps = build_taps(src_h, dst_h);
    let src = img.data();

    // Horizontal pass: src_w × src_h → dst_w × src_h, f32 intermediate.
    let mut mid = vec![0f32; dst_w * src_h * 3];
    for y in 0..src_h {
        let row = &src[y * src_w * 3..(y + 1) * src_w * 3];
        for (x, taps) in h_taps.iter().enumerate() {
            let mut acc = [0f64; 3];
            for (k, &w) in taps.weights.iter().enumerate() {
                let sx = clamp_index(taps.start + k as i64, src_w);
                for ch in 0..3 {
                    acc[ch] += w * row[sx * 3 + ch] as f64;
                }
            }
            let o = (y * dst_w + x) * 3;
            for ch in 0..3 {
                mid[o + ch] = acc[ch] as f32;
            }
        }
    }

    // Vertical pass: dst_w × src_h → dst_w × dst_h, rounded to u8.
    let mut out = vec![0u8; dst_w * dst_h * 3];
    for (y, taps) in v_taps.iter().enumerate() {
        for x in 0..dst_w {
            let mut acc = [0f64; 3];
            for (k, &w) in taps.weights.iter().enumerate() {
                let sy = clamp_index(taps.start + k as i64, src_h);
                let i = (sy * dst_w + x) * 3;
                for ch in 0..3 {
                    acc[ch] += w * mid[i + ch] as f64;
                }
            }
            let o = (y * dst_w + x) * 3;
            for ch in 0..3 {
                out[o + ch] = acc[ch].round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    RgbImage::from_raw(dst_w, dst_h, out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(w: usize, h: usize) -> RgbImage {
        let mut data = Vec::with_capacity(w * h * 3);
        for y in 0..h {
            for x in 0..w {
                let v = ((x + y) * 255 / (w + h - 2)) as u8;
                data.extend_from_slice(&[v, v, v]);
            }
        }
        RgbImage::from_raw(w, h, data).unwrap()
    }

    #[test]
    fn kernel_is_interpolating() {
        assert!((lanczos4(0.0) - 1.0).abs() < 1e-12);
        for k in 1..4 {
            assert!(lanczos4(k as f64).abs() < 1e-9, "L({k}) must be 0");
        }
        assert_eq!(lanczos4(4.0), 0.0);
        assert_eq!(lanczos4(-5.3), 0.0);
    }

    #[test]
    fn same_size_is_identity() {
        let img = gradient(32, 24);
        let out = resize_lanczos4(&img, 32, 24).unwrap();
        assert_eq!(img, out);
    }

    #[test]
    fn output_dimensions() {
        let img = gradient(64, 48);
        let out = resize_lanczos4(&img, 96, 72).unwrap();
        assert_eq!(out.width(), 96);
        assert_eq!(out.height(), 72);
        assert!(resize_lanczos4(&img, 0, 72).is_err());
    }

    #[test]
    fn solid_image_stays_solid() {
        let img = RgbImage::from_raw(20, 20, vec![77; 20 * 20 * 3]).unwrap();
        let out = resize_lanczos4(&img, 33, 13).unwrap();
        for &b in out.data() {
            assert_eq!(b, 77, "weights are normalized, so a flat image stays flat");
        }
    }

    #[test]
    fn smooth_gradient_survives_downscale() {
        let img = gradient(64, 64);
        let out = resize_lanczos4(&img, 32, 32).unwrap();
        // Center pixel of a diagonal gradient keeps its mid value.
        let mid = out.pixel(16, 16)[0] as i16;
        let expected = img.pixel(32, 32)[0] as i16;
        assert!((mid - expected).abs() <= 4, "{mid} vs {expected}");
    }

    #[test]
    fn upscale_then_downscale_is_near_identity() {
        let img = gradient(40, 40);
        let up = resize_lanczos4(&img, 80, 80).unwrap();
        let back = resize_lanczos4(&up, 40, 40).unwrap();
        for (a, b) in img.data().iter().zip(back.data()) {
            assert!(
                (*a as i16 - *b as i16).abs() <= 2,
                "2x roundtrip should be close: {a} vs {b}"
            );
        }
    }

    #[test]
    fn deterministic() {
        let img = gradient(50, 30);
        let a = resize_lanczos4(&img, 37, 23).unwrap();
        let b = resize_lanczos4(&img, 37, 23).unwrap();
        assert_eq!(a, b);
    }
}
