// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/sgpcore

//! Multi-scale recovery.
//!
//! A rescaled copy no longer aligns with the embedding grid, so a native
//! decode comes back invalid. Recovery resamples the input to a fixed ladder
//! of widths and retries; when the attempt width matches the size the
//! watermark was written at, the grid realigns and the decode validates.
//!
//! Every attempt is recorded as (width, confidence, validity). The winner is
//! the valid attempt with the highest confidence (first on ties, with an
//! early exit at full confidence). When nothing validates the verdict is
//! `NoWatermark` carrying the best confidence observed; absence of a
//! watermark is a lookup result, not an error.

use crate::image::resize::resize_lanczos4;
use crate::image::RgbImage;
use crate::wm::error::WmError;
use crate::wm::payload::WatermarkPayload;
use crate::wm::pipeline::extract_payload;
use crate::wm::{progress, CodecContext};

/// Retry widths, tried in order. Height scales proportionally.
pub const RECOVERY_WIDTHS: [usize; 5] = [512, 768, 1024, 1280, 2048];

/// Audit outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Watermarked,
    NoWatermark,
}

/// What an audit found.
#[derive(Debug, Clone)]
pub struct AuditRecord {
    pub verdict: Verdict,
    /// The recovered payload; `None` under a `NoWatermark` verdict.
    pub payload: Option<WatermarkPayload>,
    /// Vote confidence of the reported attempt, in [0, 1].
    pub confidence: f32,
    /// Width of the attempt that produced this record (the input's own
    /// width when the native attempt decoded).
    pub scale_used: usize,
}

/// One extraction attempt at a given width.
struct Attempt {
    width: usize,
    confidence: f32,
    payload: Option<WatermarkPayload>,
}

/// Extract with multi-scale recovery.
///
/// Errors only on structural problems: an image too small at every scale,
/// or cancellation.
pub fn extract_multiscale(
    img: &RgbImage,
    ctx: &CodecContext,
) -> Result<AuditRecord, WmError> {
    progress::init(1 + RECOVERY_WIDTHS.len() as u32);

    // Native attempt first; a valid native decode short-circuits recovery.
    let mut failed: Vec<Attempt> = Vec::new();
    let mut ran_any = false;
    match extract_payload(img, ctx) {
        Ok((payload, confidence)) => {
            if payload.is_some() {
                progress::finish();
                return Ok(AuditRecord {
                    verdict: Verdict::Watermarked,
                    payload,
                    confidence,
                    scale_used: img.width(),
                });
            }
            ran_any = true;
            failed.push(Attempt {
                width: img.width(),
                confidence,
                payload: None,
            });
        }
        Err(WmError::TooSmall) => {}
        Err(e) => return Err(e),
    }
    progress::advance();

    let mut best_valid: Option<Attempt> = None;
    for &width in RECOVERY_WIDTHS.iter() {
        progress::check_cancelled()?;
        if width == img.width() {
            progress::advance();
            continue; // the native attempt already covered this geometry
        }
        let height = scaled_height(img.width(), img.height(), width);
        let resized = resize_lanczos4(img, width, height)?;
        match extract_payload(&resized, ctx) {
            Ok((payload, confidence)) => {
                ran_any = true;
                if payload.is_some() {
                    log::debug!("valid decode at width {width} (confidence {confidence:.2})");
                    let better = best_valid
                        .as_ref()
                        .map_or(true, |b| confidence > b.confidence);
                    if better {
                        best_valid = Some(Attempt {
                            width,
                            confidence,
                            payload,
                        });
                    }
                    if confidence >= 1.0 {
                        break; // nothing can outrank a unanimous vote
                    }
                } else {
                    failed.push(Attempt {
                        width,
                        confidence,
                        payload: None,
                    });
                }
            }
            Err(WmError::TooSmall) => {} // this rung of the ladder is too coarse
            Err(e) => return Err(e),
        }
        progress::advance();
    }
    progress::finish();

    if let Some(best) = best_valid {
        return Ok(AuditRecord {
            verdict: Verdict::Watermarked,
            payload: best.payload,
            confidence: best.confidence,
            scale_used: best.width,
        });
    }
    if !ran_any {
        return Err(WmError::TooSmall);
    }

    // Nothing validated: report the best-confidence failed decode.
    let mut best = &failed[0];
    for a in &failed[1..] {
        if a.confidence > best.confidence {
            best = a;
        }
    }
    Ok(AuditRecord {
        verdict: Verdict::NoWatermark,
        payload: None,
        confidence: best.confidence,
        scale_used: best.width,
    })
}

/// Proportional height for a target width, rounded to nearest.
pub(crate) fn scaled_height(src_w: usize, src_h: usize, dst_w: usize) -> usize {
    (((src_h as u64) * (dst_w as u64) + (src_w as u64) / 2) / src_w as u64).max(1) as usize
}
