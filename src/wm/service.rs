// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/sgpcore

//! Public codec operations.
//!
//! Thin orchestration over the pipelines: authorize, build the payload,
//! embed. Everything here is pure; persisting the returned images and any
//! bookkeeping of master files is the caller's concern.

use crate::image::RgbImage;
use crate::wm::drm::{authorize_master, MasterDecision, Permissions};
use crate::wm::error::WmError;
use crate::wm::multiscale::{extract_multiscale, AuditRecord};
use crate::wm::payload::{WatermarkPayload, CURRENT_UID_BITS, NULL_UID, ORIGINAL_UID_BITS};
use crate::wm::pipeline::embed_payload;
use crate::wm::CodecContext;

/// Create (or update, or fork) a master copy.
///
/// Extracts any existing watermark, runs the authorization table and embeds
/// a fresh master payload `(actor_uid, 0, actor_flags)`. Returns the
/// watermarked image and the decision that allowed it.
///
/// # Errors
/// - [`WmError::DerivativeForbidden`] when another owner's watermark forbids
///   derivative works; the input pixels are never modified in that case.
/// - [`WmError::UidOverflow`], [`WmError::TooSmall`], [`WmError::Cancelled`].
pub fn create_master(
    img: &RgbImage,
    actor_uid: u128,
    actor_flags: Permissions,
    ctx: &CodecContext,
) -> Result<(RgbImage, MasterDecision), WmError> {
    if actor_uid >> ORIGINAL_UID_BITS != 0 {
        return Err(WmError::UidOverflow {
            uid: actor_uid,
            max_bits: ORIGINAL_UID_BITS,
        });
    }

    let existing = extract_multiscale(img, ctx)?;
    let decision = authorize_master(existing.payload.as_ref(), actor_uid)?;
    log::info!("master authorization for {actor_uid}: {decision:?}");

    let payload = WatermarkPayload::master(
        actor_uid,
        actor_flags.allow_derivative,
        actor_flags.allow_reprint,
    );
    let out = embed_payload(img, &payload, ctx)?;
    Ok((out, decision))
}

/// Mint a distribution copy for a recipient.
///
/// The input must carry a valid master watermark (`current_uid == 0`). The
/// recipient payload keeps the master's owner and permission flags and is
/// embedded into the master's own pixels, not into a reconstruction.
///
/// # Errors
/// - [`WmError::DecodeFailed`] when no valid watermark can be recovered.
/// - [`WmError::NotAMaster`] when the watermark names a nonzero holder.
/// - [`WmError::NullRecipient`], [`WmError::UidOverflow`],
///   [`WmError::TooSmall`], [`WmError::Cancelled`].
pub fn generate_distribution(
    master: &RgbImage,
    recipient_uid: u128,
    ctx: &CodecContext,
) -> Result<RgbImage, WmError> {
    if recipient_uid == NULL_UID {
        return Err(WmError::NullRecipient);
    }
    if recipient_uid >> CURRENT_UID_BITS != 0 {
        return Err(WmError::UidOverflow {
            uid: recipient_uid,
            max_bits: CURRENT_UID_BITS,
        });
    }

    let record = extract_multiscale(master, ctx)?;
    let payload = record.payload.ok_or(WmError::DecodeFailed)?;
    if !payload.is_master() {
        return Err(WmError::NotAMaster {
            current_uid: payload.current_uid,
        });
    }
    log::info!(
        "minting distribution of {}'s master for {recipient_uid} (confidence {:.2})",
        payload.original_uid,
        record.confidence
    );

    embed_payload(master, &payload.distribution(recipient_uid), ctx)
}

/// Rewrite a master's permission flags in place.
///
/// Owner and master status are preserved; only the flags change.
pub fn update_master_permissions(
    master: &RgbImage,
    new_flags: Permissions,
    ctx: &CodecContext,
) -> Result<RgbImage, WmError> {
    let record = extract_multiscale(master, ctx)?;
    let payload = record.payload.ok_or(WmError::DecodeFailed)?;
    if !payload.is_master() {
        return Err(WmError::NotAMaster {
            current_uid: payload.current_uid,
        });
    }

    let updated = WatermarkPayload::master(
        payload.original_uid,
        new_flags.allow_derivative,
        new_flags.allow_reprint,
    );
    embed_payload(master, &updated, ctx)
}

/// Attribute an image: payload (if any), confidence and the scale that
/// decoded. Absence of a watermark is a normal outcome, not an error.
pub fn audit(img: &RgbImage, ctx: &CodecContext) -> Result<AuditRecord, WmError> {
    extract_multiscale(img, ctx)
}

/// Aggregate results of auditing a batch of images.
#[derive(Debug)]
pub struct BatchAudit {
    pub total: usize,
    pub watermarked: usize,
    pub unmarked: usize,
    pub masters: usize,
    pub distributions: usize,
    /// Per-image outcome, in input order.
    pub records: Vec<Result<AuditRecord, WmError>>,
}

/// Audit a batch of in-memory images. Per-image failures (e.g. one image
/// too small) are recorded, not propagated, so one bad input never aborts
/// the sweep.
pub fn batch_audit(images: &[RgbImage], ctx: &CodecContext) -> BatchAudit {
    let mut stats = BatchAudit {
        total: images.len(),
        watermarked: 0,
        unmarked: 0,
        masters: 0,
        distributions: 0,
        records: Vec::with_capacity(images.len()),
    };

    for img in images {
        let record = audit(img, ctx);
        match &record {
            Ok(r) => match &r.payload {
                Some(p) => {
                    stats.watermarked += 1;
                    if p.is_master() {
                        stats.masters += 1;
                    } else {
                        stats.distributions += 1;
                    }
                }
                None => stats.unmarked += 1,
            },
            Err(e) => log::warn!("batch audit entry failed: {e}"),
        }
        stats.records.push(record);
    }
    stats
}
