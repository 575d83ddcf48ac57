// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/sgpcore

//! RGB ↔ YCrCb conversion (ITU-R BT.601 full-range).
//!
//! The watermark touches only the luma channel. Conversion quantizes all
//! three planes to u8 (matching the behavior of mainstream image libraries),
//! then lifts Y to f32 for the transform chain; Cr and Cb ride along
//! untouched and are recombined at the end.
//!
//! Constants are the full-range BT.601 set:
//!
//! ```text
//! Y  = 0.299·R + 0.587·G + 0.114·B
//! Cr = (R − Y)·0.713 + 128
//! Cb = (B − Y)·0.564 + 128
//! ```

use crate::image::RgbImage;

/// A single-channel f32 plane, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    pub width: usize,
    pub height: usize,
    pub data: Vec<f32>,
}

impl Plane {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; width * height],
        }
    }

    #[inline]
    pub fn at(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: f32) {
        self.data[y * self.width + x] = v;
    }
}

/// Split result: f32 luma plane plus u8 chroma planes.
pub struct YCrCbPlanes {
    pub y: Plane,
    pub cr: Vec<u8>,
    pub cb: Vec<u8>,
}

#[inline]
fn quantize(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Split an RGB image into a quantized luma plane (as f32) and u8 chroma.
pub fn split_ycrcb(img: &RgbImage) -> YCrCbPlanes {
    let (w, h) = (img.width(), img.height());
    let mut y = Plane::new(w, h);
    let mut cr = vec![0u8; w * h];
    let mut cb = vec![0u8; w * h];

    for (i, px) in img.data().chunks_exact(3).enumerate() {
        let r = px[0] as f32;
        let g = px[1] as f32;
        let b = px[2] as f32;
        let yf = 0.299 * r + 0.587 * g + 0.114 * b;
        cr[i] = quantize((r - yf) * 0.713 + 128.0);
        cb[i] = quantize((b - yf) * 0.564 + 128.0);
        y.data[i] = quantize(yf) as f32;
    }

    YCrCbPlanes { y, cr, cb }
}

/// Recombine a (possibly modified) luma plane with the original chroma.
///
/// Luma values are clipped to [0, 255] and rounded before the inverse
/// transform, so out-of-range excursions from the watermarking step cannot
/// leak into chroma.
pub fn merge_ycrcb(y: &Plane, cr: &[u8], cb: &[u8]) -> RgbImage {
    let (w, h) = (y.width, y.height);
    debug_assert_eq!(cr.len(), w * h);
    debug_assert_eq!(cb.len(), w * h);

    let mut data = vec![0u8; w * h * 3];
    for i in 0..w * h {
        let yv = y.data[i].round().clamp(0.0, 255.0);
        let crv = cr[i] as f32 - 128.0;
        let cbv = cb[i] as f32 - 128.0;
        data[i * 3] = quantize(yv + 1.403 * crv);
        data[i * 3 + 1] = quantize(yv - 0.714 * crv - 0.344 * cbv);
        data[i * 3 + 2] = quantize(yv + 1.773 * cbv);
    }
    RgbImage::from_raw(w, h, data).expect("dimensions come from a valid image")
}
