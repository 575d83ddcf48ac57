// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/sgpcore

//! 8×8 orthonormal DCT (type II) and its inverse (type III).
//!
//! Operates on subband tiles, not pixels, so there is no level shift and no
//! quantization table. Accumulation is f64 against fixed cosine tables built
//! with [`det_math`](crate::det_math); results are rounded once to f32 on
//! store. With orthonormal norm, `idct8(dct8(t)) == t` up to f32 rounding.

use std::sync::OnceLock;

/// Pre-computed cosine table: `COSINE[u][x] = cos((2*x + 1) * u * PI / 16)`.
static COSINE: OnceLock<[[f64; 8]; 8]> = OnceLock::new();

/// Normalization constants: C(0) = 1/sqrt(8), C(u>0) = 1/2.
static NORM: OnceLock<[f64; 8]> = OnceLock::new();

fn cosine_table() -> &'static [[f64; 8]; 8] {
    COSINE.get_or_init(|| {
        let mut table = [[0.0f64; 8]; 8];
        for u in 0..8 {
            for x in 0..8 {
                table[u][x] = crate::det_math::det_cos(
                    (2 * x + 1) as f64 * u as f64 * std::f64::consts::PI / 16.0,
                );
            }
        }
        table
    })
}

fn norm_table() -> &'static [f64; 8] {
    NORM.get_or_init(|| {
        let mut n = [0.5f64; 8];
        n[0] = 1.0 / (8.0f64).sqrt();
        n
    })
}

/// Forward 8×8 orthonormal DCT-II of a subband tile.
///
/// Output index (u, v) = u * 8 + v, u = vertical frequency.
pub fn dct8(tile: &[f32; 64]) -> [f32; 64] {
    let cos = cosine_table();
    let c = norm_table();

    // Separable: rows first.
    let mut temp = [0.0f64; 64];
    for row in 0..8 {
        for u in 0..8 {
            let mut sum = 0.0;
            for x in 0..8 {
                sum += tile[row * 8 + x] as f64 * cos[u][x];
            }
            temp[row * 8 + u] = c[u] * sum;
        }
    }

    // Then columns.
    let mut out = [0.0f32; 64];
    for col in 0..8 {
        for v in 0..8 {
            let mut sum = 0.0;
            for y in 0..8 {
                sum += temp[y * 8 + col] * cos[v][y];
            }
            out[v * 8 + col] = (c[v] * sum) as f32;
        }
    }
    out
}

/// Inverse 8×8 orthonormal DCT (type III) back to a subband tile.
pub fn idct8(coeffs: &[f32; 64]) -> [f32; 64] {
    let cos = cosine_table();
    let c = norm_table();

    // Separable: columns first.
    let mut temp = [0.0f64; 64];
    for col in 0..8 {
        for y in 0..8 {
            let mut sum = 0.0;
            for v in 0..8 {
                sum += c[v] * coeffs[v * 8 + col] as f64 * cos[v][y];
            }
            temp[y * 8 + col] = sum;
        }
    }

    // Then rows.
    let mut out = [0.0f32; 64];
    for row in 0..8 {
        for x in 0..8 {
            let mut sum = 0.0;
            for u in 0..8 {
                sum += c[u] * temp[row * 8 + u] * cos[u][x];
            }
            out[row * 8 + x] = sum as f32;
        }
    }
    out
}
