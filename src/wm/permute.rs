// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/sgpcore

//! Key-driven block ordering.
//!
//! Derives a 64-bit seed from `SHA-256(key || u32_le(sub_w) || u32_le(sub_h))`
//! (low 8 digest bytes, little-endian) and Fisher-Yates-shuffles the tile
//! grid with xoshiro256\*\*. `seed_from_u64` expands the seed through
//! SplitMix64, so the full PRNG is pinned: any conforming implementation of
//! SplitMix64 + xoshiro256\*\* reproduces the same permutation.
//!
//! # Cross-platform portability
//!
//! The shuffle draws with `u32` bounds (not `usize`) so the PRNG consumes
//! identical entropy per step on 32-bit and 64-bit targets. A `usize` bound
//! would produce completely different permutations on WASM vs native.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use sha2::{Digest, Sha256};

use crate::wm::BLOCK_SIZE;

/// Derive the permutation seed for a subband of the given dimensions.
pub fn derive_seed(key: &[u8], sub_w: u32, sub_h: u32) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(key);
    hasher.update(sub_w.to_le_bytes());
    hasher.update(sub_h.to_le_bytes());
    let digest = hasher.finalize();
    u64::from_le_bytes(digest[0..8].try_into().expect("digest is 32 bytes"))
}

/// The canonical key-driven ordering of all complete 8×8 tiles of an
/// `sub_w` × `sub_h` subband.
///
/// Coordinates are (row, col) sample offsets, both multiples of 8. For fixed
/// (key, sub_w, sub_h) the result is identical across platforms; without the
/// key the sequence is unpredictable.
pub fn block_order(key: &[u8], sub_w: usize, sub_h: usize) -> Vec<(usize, usize)> {
    let tiles_wide = sub_w / BLOCK_SIZE;
    let tiles_tall = sub_h / BLOCK_SIZE;

    let mut coords = Vec::with_capacity(tiles_wide * tiles_tall);
    for r in 0..tiles_tall {
        for c in 0..tiles_wide {
            coords.push((r * BLOCK_SIZE, c * BLOCK_SIZE));
        }
    }

    let seed = derive_seed(key, sub_w as u32, sub_h as u32);
    let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
    let n = coords.len();
    for i in (1..n).rev() {
        let j = rng.gen_range(0..=(i as u32)) as usize;
        coords.swap(i, j);
    }
    coords
}
