// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/sgpcore

//! Embed and extract at the image's native size.
//!
//! Embedding path: RGB → YCrCb → Y → Haar DWT → HL → selected 8×8 tiles →
//! DCT → QIM on coefficient (4, 3) → inverse DCT → inverse DWT → clip →
//! recombine. Extraction mirrors it and ends in majority voting and payload
//! validation. Both are pure functions of (pixels, key, step, payload);
//! cancellation is checked at every transform boundary.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::image::color;
use crate::image::dct::{dct8, idct8};
use crate::image::dwt;
use crate::image::RgbImage;
use crate::wm::error::WmError;
use crate::wm::payload::{bits_to_bytes, bytes_to_bits, WatermarkPayload};
use crate::wm::qim::{self, QIM_COEFF_INDEX};
use crate::wm::{progress, selection, validate_dimensions, voting, CodecContext, PAYLOAD_BITS};

/// Embed a payload into an image.
///
/// Returns a new image of identical dimensions; the input is untouched.
///
/// # Errors
/// - [`WmError::TooSmall`] if the image is under 128px a side or its HL
///   subband holds fewer than 1280 complete tiles.
/// - [`WmError::UidOverflow`] if a payload UID does not fit its field.
/// - [`WmError::Cancelled`] if the caller cancelled mid-call.
pub fn embed_payload(
    img: &RgbImage,
    payload: &WatermarkPayload,
    ctx: &CodecContext,
) -> Result<RgbImage, WmError> {
    validate_dimensions(img.width(), img.height())?;
    let payload_bytes = payload.to_bytes()?;
    let bits = bytes_to_bits(&payload_bytes);

    progress::check_cancelled()?;
    let planes = color::split_ycrcb(img);
    let mut bands = dwt::forward_haar(&planes.y);

    progress::check_cancelled()?;
    let targets = selection::select_blocks(&bands.hl, ctx.key())?;

    progress::check_cancelled()?;
    let step = ctx.qim_step();
    for (i, &(row, col)) in targets.iter().enumerate() {
        let tile = bands.hl.tile(row, col);
        let mut coeffs = dct8(&tile);
        coeffs[QIM_COEFF_INDEX] =
            qim::embed_bit(coeffs[QIM_COEFF_INDEX], bits[voting::bit_index(i)], step);
        bands.hl.set_tile(row, col, &idct8(&coeffs));
    }
    log::debug!(
        "embedded {} blocks ({:.1}x redundancy, step {step})",
        targets.len(),
        targets.len() as f64 / PAYLOAD_BITS as f64,
    );

    progress::check_cancelled()?;
    let y = dwt::inverse_haar(&bands, &planes.y);
    Ok(color::merge_ycrcb(&y, &planes.cr, &planes.cb))
}

/// Extract at native size: the decoded payload (if any) and the vote
/// confidence.
///
/// An invalid decode (bad magic or CRC) is a normal outcome reported as
/// `None`; only structural problems (image too small, cancellation) are
/// errors.
pub fn extract_payload(
    img: &RgbImage,
    ctx: &CodecContext,
) -> Result<(Option<WatermarkPayload>, f32), WmError> {
    validate_dimensions(img.width(), img.height())?;

    progress::check_cancelled()?;
    let planes = color::split_ycrcb(img);
    let bands = dwt::forward_haar(&planes.y);

    progress::check_cancelled()?;
    let targets = selection::select_blocks(&bands.hl, ctx.key())?;

    progress::check_cancelled()?;
    let step = ctx.qim_step();
    let hl = &bands.hl;
    let read_tile = |&(row, col): &(usize, usize)| -> u8 {
        let coeffs = dct8(&hl.tile(row, col));
        qim::extract_bit(coeffs[QIM_COEFF_INDEX], step)
    };

    #[cfg(feature = "parallel")]
    let samples: Vec<u8> = targets.par_iter().map(read_tile).collect();
    #[cfg(not(feature = "parallel"))]
    let samples: Vec<u8> = targets.iter().map(read_tile).collect();

    let outcome = voting::majority_vote(&samples)?;
    let bytes = bits_to_bytes(&outcome.bits);
    match WatermarkPayload::from_bytes(&bytes, ctx.is_strict()) {
        Ok(p) => {
            log::debug!(
                "decoded payload (owner {}, holder {}, confidence {:.2})",
                p.original_uid,
                p.current_uid,
                outcome.confidence
            );
            Ok((Some(p), outcome.confidence))
        }
        Err(reason) => {
            log::debug!("payload rejected: {reason}");
            Ok((None, outcome.confidence))
        }
    }
}
