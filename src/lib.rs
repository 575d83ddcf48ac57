// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/sgpcore

//! # sgp-core
//!
//! Blind image watermarking engine for ownership tracking. Embeds a 32-byte
//! payload (owner UID, holder UID, permission flags) into the luma channel of
//! an RGB image via DWT → block-DCT → QIM, with 5× redundancy and majority
//! voting so the payload survives lossy re-encoding and moderate rescaling.
//!
//! Two image classes exist in the protocol:
//!
//! - **Master**: embedded holder UID is zero. The canonical archive copy
//!   owned by the original author.
//! - **Distribution copy**: holder UID names the recipient; the owner UID is
//!   preserved from the master.
//!
//! The secret key controls *where* bits live (block permutation), not what
//! they say. All processing is pure and in-memory; file I/O and image
//! decoding belong to the caller.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use sgp_core::{audit, create_master, CodecContext, Permissions, RgbImage};
//!
//! let ctx = CodecContext::new(b"a-long-secret-key".to_vec(), 40.0)?;
//! let img = RgbImage::from_raw(1024, 1024, pixels)?;
//! let perms = Permissions { allow_derivative: true, allow_reprint: false };
//! let (master, _) = create_master(&img, 12345, perms, &ctx)?;
//! let record = audit(&master, &ctx)?;
//! assert_eq!(record.payload.unwrap().original_uid, 12345);
//! ```

pub mod det_math;
pub mod image;
pub mod wm;

pub use image::resize::resize_lanczos4;
pub use image::{ImageError, RgbImage};
pub use wm::drm::{authorize_master, MasterDecision, Permissions};
pub use wm::error::WmError;
pub use wm::multiscale::{AuditRecord, Verdict, RECOVERY_WIDTHS};
pub use wm::payload::{InvalidPayload, WatermarkPayload, NULL_UID};
pub use wm::pipeline::{embed_payload, extract_payload};
pub use wm::service::{
    audit, batch_audit, create_master, generate_distribution, update_master_permissions,
    BatchAudit,
};
pub use wm::{CodecContext, DEFAULT_QIM_STEP, MIN_BLOCKS, PAYLOAD_BITS, TARGET_REDUNDANCY};
