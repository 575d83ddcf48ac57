// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/sgpcore

//! The watermarking protocol layer.
//!
//! Composes the transform kernel into the two embedding-side operations
//! (master creation, distribution minting) and the extraction side
//! (native decode, multi-scale recovery, audit). Submodules:
//!
//! - [`payload`]: the 32-byte ownership record (magic + CRC framing)
//! - [`permute`]: key-driven block ordering (SHA-256 seed → xoshiro256**)
//! - [`selection`]: adaptive Top-N tile selection with the safety buffer
//! - [`qim`]: parity quantization of the fixed mid-frequency coefficient
//! - [`voting`]: redundancy layout and majority voting
//! - [`pipeline`]: embed / extract at native size
//! - [`multiscale`]: rescaled recovery attempts and the audit record
//! - [`drm`]: permission flags and the master authorization decision
//! - [`service`]: public operations
//! - [`progress`]: cooperative cancellation shared by the pipelines

pub mod drm;
pub mod error;
pub mod multiscale;
pub mod payload;
pub mod permute;
pub mod pipeline;
pub mod progress;
pub mod qim;
pub mod selection;
pub mod service;
pub mod voting;

use error::WmError;

/// Payload size in bits (32 bytes, MSB-first).
pub const PAYLOAD_BITS: usize = 256;

/// How many blocks carry each payload bit.
pub const TARGET_REDUNDANCY: usize = 5;

/// Blocks written per image: one bit per block, every bit repeated
/// `TARGET_REDUNDANCY` times.
pub const MIN_BLOCKS: usize = PAYLOAD_BITS * TARGET_REDUNDANCY; // 1280

/// Safety-buffer expansion over `MIN_BLOCKS`. Lossy re-encoding perturbs
/// tile variances near the selection threshold; the 2× pool keeps every
/// embedded tile inside the candidate set. Do not tune below ~1.5×.
pub const BUFFER_RATIO: usize = 2;

/// Size of the variance-ranked candidate pool.
pub const SAFETY_BUFFER_BLOCKS: usize = MIN_BLOCKS * BUFFER_RATIO; // 2560

/// Tile edge length in subband samples.
pub const BLOCK_SIZE: usize = 8;

/// Minimum accepted image edge in pixels. Necessary but not sufficient:
/// embedding also needs `MIN_BLOCKS` complete HL tiles.
pub const MIN_DIMENSION: usize = 128;

/// Default QIM quantization step. Typical range is [30, 50]; larger steps
/// trade visibility for robustness.
pub const DEFAULT_QIM_STEP: f32 = 40.0;

/// Caller-owned codec parameters, passed explicitly to every operation.
///
/// Keeping the key and step out of global state keeps every codec call a
/// pure function and makes concurrent use trivially safe.
#[derive(Debug, Clone)]
pub struct CodecContext {
    key: Vec<u8>,
    qim_step: f32,
    strict: bool,
}

impl CodecContext {
    /// Build a context from a secret key and a QIM step.
    ///
    /// The key is opaque bytes; callers should supply at least 16 bytes of
    /// entropy. The step must be positive and finite.
    pub fn new(key: impl Into<Vec<u8>>, qim_step: f32) -> Result<Self, WmError> {
        if !qim_step.is_finite() || qim_step <= 0.0 {
            return Err(WmError::InvalidStep(qim_step));
        }
        Ok(Self {
            key: key.into(),
            qim_step,
            strict: false,
        })
    }

    /// Context with the default step of 40.0.
    pub fn with_default_step(key: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            qim_step: DEFAULT_QIM_STEP,
            strict: false,
        }
    }

    /// Enable or disable strict payload validation (reject nonzero reserved
    /// bits on read). Default is lenient.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }

    pub fn qim_step(&self) -> f32 {
        self.qim_step
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }
}

/// Boundary check shared by embed and extract.
pub(crate) fn validate_dimensions(width: usize, height: usize) -> Result<(), WmError> {
    if width < MIN_DIMENSION || height < MIN_DIMENSION {
        return Err(WmError::TooSmall);
    }
    Ok(())
}
