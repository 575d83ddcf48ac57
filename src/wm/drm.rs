// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/sgpcore

//! Master authorization: who may (re)write a master watermark.
//!
//! Four cases cover every combination of (payload present, owner match,
//! derivative permission):
//!
//! | existing payload | condition | decision |
//! |------------------|-----------|----------|
//! | absent/invalid   | —         | create a fresh master |
//! | present          | owner == actor | update the own master |
//! | present          | owner ≠ actor, derivatives allowed | fork under the new owner |
//! | present          | owner ≠ actor, derivatives forbidden | reject |
//!
//! Rejection happens before any pixel is touched. Distribution minting never
//! consults this table; it always preserves the master's owner.

use crate::wm::error::WmError;
use crate::wm::payload::WatermarkPayload;

/// The two permission bits carried in the payload flags byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Permissions {
    pub allow_derivative: bool,
    pub allow_reprint: bool,
}

/// How a master write was authorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MasterDecision {
    /// No (valid) watermark present: a fresh master.
    CreateMaster,
    /// The actor already owns the embedded watermark.
    UpdateMaster,
    /// Another owner's work, derivatives allowed: re-owned fork.
    ForkMaster,
}

/// Decide whether `actor_uid` may write a master over `existing`.
///
/// Fails with [`WmError::DerivativeForbidden`] in the single rejecting case.
pub fn authorize_master(
    existing: Option<&WatermarkPayload>,
    actor_uid: u128,
) -> Result<MasterDecision, WmError> {
    match existing {
        None => Ok(MasterDecision::CreateMaster),
        Some(p) if p.original_uid == actor_uid => Ok(MasterDecision::UpdateMaster),
        Some(p) if p.allow_derivative => Ok(MasterDecision::ForkMaster),
        Some(p) => Err(WmError::DerivativeForbidden {
            original_uid: p.original_uid,
        }),
    }
}
