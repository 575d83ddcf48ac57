// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/sgpcore

//! Adaptive Top-N tile selection.
//!
//! Embedder and extractor must agree on which HL tiles carry bits even after
//! lossy re-encoding has nudged every tile's variance. Two mechanisms make
//! the selection survive:
//!
//! - **Safety buffer**: the candidate pool is 2× the number of tiles
//!   actually used, so a tile whose variance rank drifts near the threshold
//!   stays inside the pool.
//! - **Coordinate anchoring**: variance ties break on (row, col), so the
//!   ranking is a function of the image, not of sort stability.
//!
//! The pool's variance order is then discarded: members are reordered by
//! their index in the key-driven permutation and the first `MIN_BLOCKS`
//! survive. On images whose tile count does not exceed the pool size the
//! selection is therefore independent of variance entirely.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::image::dwt::Subband;
use crate::wm::error::WmError;
use crate::wm::{permute, BLOCK_SIZE, MIN_BLOCKS, SAFETY_BUFFER_BLOCKS};

/// Population variance of the 8×8 tile at (row, col), f64 accumulation.
pub fn tile_variance(sub: &Subband, row: usize, col: usize) -> f64 {
    let mut sum = 0f64;
    for dy in 0..BLOCK_SIZE {
        for dx in 0..BLOCK_SIZE {
            sum += sub.at(col + dx, row + dy) as f64;
        }
    }
    let mean = sum / 64.0;
    let mut ssq = 0f64;
    for dy in 0..BLOCK_SIZE {
        for dx in 0..BLOCK_SIZE {
            let d = sub.at(col + dx, row + dy) as f64 - mean;
            ssq += d * d;
        }
    }
    ssq / 64.0
}

/// (variance, row, col) for every complete tile, row-major.
fn tile_variances(sub: &Subband) -> Vec<(f64, usize, usize)> {
    let tiles_wide = sub.width / BLOCK_SIZE;
    let tiles_tall = sub.height / BLOCK_SIZE;
    let entry = |i: usize| {
        let row = (i / tiles_wide) * BLOCK_SIZE;
        let col = (i % tiles_wide) * BLOCK_SIZE;
        (tile_variance(sub, row, col), row, col)
    };

    #[cfg(feature = "parallel")]
    {
        (0..tiles_wide * tiles_tall).into_par_iter().map(entry).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        (0..tiles_wide * tiles_tall).map(entry).collect()
    }
}

/// The `MIN_BLOCKS` tiles that carry bits, in embedding order.
///
/// Fails with [`WmError::TooSmall`] when the subband holds fewer than
/// `MIN_BLOCKS` complete tiles.
pub fn select_blocks(sub: &Subband, key: &[u8]) -> Result<Vec<(usize, usize)>, WmError> {
    let tiles_wide = sub.width / BLOCK_SIZE;
    let tiles_tall = sub.height / BLOCK_SIZE;
    let total = tiles_wide * tiles_tall;
    if total < MIN_BLOCKS {
        return Err(WmError::TooSmall);
    }

    let mut ranked = tile_variances(sub);
    ranked.sort_by(|a, b| {
        b.0.total_cmp(&a.0)
            .then_with(|| (a.1, a.2).cmp(&(b.1, b.2)))
    });
    ranked.truncate(SAFETY_BUFFER_BLOCKS.min(total));

    // Index every tile by its position in the key-driven permutation, then
    // order the pool by that index. Both sides compute the identical pool
    // (up to threshold drift the 2× margin absorbs) and the identical order.
    let order = permute::block_order(key, sub.width, sub.height);
    let mut order_index = vec![0usize; total];
    for (i, &(r, c)) in order.iter().enumerate() {
        order_index[(r / BLOCK_SIZE) * tiles_wide + c / BLOCK_SIZE] = i;
    }

    let mut pool: Vec<(usize, usize)> = ranked.into_iter().map(|(_, r, c)| (r, c)).collect();
    pool.sort_by_key(|&(r, c)| order_index[(r / BLOCK_SIZE) * tiles_wide + c / BLOCK_SIZE]);
    pool.truncate(MIN_BLOCKS);

    if pool.len() < MIN_BLOCKS {
        return Err(WmError::Internal("selection pool shorter than MIN_BLOCKS"));
    }
    log::debug!(
        "selected {} of {} tiles (pool {})",
        pool.len(),
        total,
        SAFETY_BUFFER_BLOCKS.min(total)
    );
    Ok(pool)
}
