// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/sgpcore

//! Redundancy layout and majority voting.
//!
//! The i-th selected tile carries payload bit `i mod 256`, so the 1280-tile
//! sequence holds five interleaved copies of the payload. On extraction each
//! bit position gets five samples; the decoded bit is the majority and the
//! decode confidence is the weakest position's majority fraction.

use crate::wm::error::WmError;
use crate::wm::{MIN_BLOCKS, PAYLOAD_BITS, TARGET_REDUNDANCY};

/// The payload bit carried by the tile at sequence position `i`.
#[inline]
pub fn bit_index(i: usize) -> usize {
    i % PAYLOAD_BITS
}

/// Result of a majority vote over the extracted sample stream.
#[derive(Debug, Clone)]
pub struct VoteOutcome {
    /// The 256 decoded payload bits.
    pub bits: Vec<u8>,
    /// `min` over bit positions of the majority fraction, in [0, 1].
    /// With five samples per position the values are 0.6, 0.8 or 1.0.
    pub confidence: f32,
}

/// Majority-vote the raw sample stream back into payload bits.
///
/// `samples[i]` is the bit read from the i-th selected tile. The stream
/// length is fixed by selection at `MIN_BLOCKS`; anything else is a
/// programming error upstream.
pub fn majority_vote(samples: &[u8]) -> Result<VoteOutcome, WmError> {
    if samples.len() != MIN_BLOCKS {
        return Err(WmError::Internal("vote expects MIN_BLOCKS samples"));
    }

    let r = TARGET_REDUNDANCY as u32;
    let mut ones = [0u32; PAYLOAD_BITS];
    for (i, &b) in samples.iter().enumerate() {
        ones[bit_index(i)] += (b & 1) as u32;
    }

    let mut bits = Vec::with_capacity(PAYLOAD_BITS);
    let mut min_majority = r;
    for &count in ones.iter() {
        let bit = (2 * count > r) as u8;
        bits.push(bit);
        let majority = count.max(r - count);
        min_majority = min_majority.min(majority);
    }

    Ok(VoteOutcome {
        bits,
        confidence: min_majority as f32 / r as f32,
    })
}
