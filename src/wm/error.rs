// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/sgpcore

//! Error types for the watermarking layer.
//!
//! [`WmError`] covers all failure modes from input validation through the
//! DRM decision. Absence of a watermark is *not* an error; audit reports it
//! as a normal `no_watermark` verdict. Errors carry the offending UID or
//! parameter where relevant, never pixel data.

use core::fmt;

use crate::image::ImageError;

/// Errors surfaced by the codec operations.
#[derive(Debug)]
pub enum WmError {
    /// The pixel buffer itself is malformed.
    BadImage(ImageError),
    /// The image has too few pixels or too few usable HL tiles.
    TooSmall,
    /// The QIM step is not a positive finite number.
    InvalidStep(f32),
    /// A UID does not fit its payload field.
    UidOverflow { uid: u128, max_bits: u32 },
    /// A distribution recipient UID of zero would mint a second master.
    NullRecipient,
    /// Distribution was requested from an image whose holder UID is nonzero.
    NotAMaster { current_uid: u128 },
    /// The embedded owner forbids derivative works.
    DerivativeForbidden { original_uid: u128 },
    /// No valid payload could be recovered where one was required.
    DecodeFailed,
    /// The operation was cancelled by the caller.
    Cancelled,
    /// Internal invariant violation; indicates a bug, not a data condition.
    Internal(&'static str),
}

impl fmt::Display for WmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadImage(e) => write!(f, "bad image buffer: {e}"),
            Self::TooSmall => write!(f, "image too small for embedding"),
            Self::InvalidStep(s) => write!(f, "QIM step {s} is not a positive finite number"),
            Self::UidOverflow { uid, max_bits } => {
                write!(f, "uid {uid} does not fit in {max_bits} bits")
            }
            Self::NullRecipient => write!(f, "distribution recipient uid must be nonzero"),
            Self::NotAMaster { current_uid } => {
                write!(f, "not a master copy (holder uid {current_uid})")
            }
            Self::DerivativeForbidden { original_uid } => {
                write!(f, "owner {original_uid} forbids derivative works")
            }
            Self::DecodeFailed => write!(f, "no valid watermark payload recovered"),
            Self::Cancelled => write!(f, "operation cancelled by caller"),
            Self::Internal(what) => write!(f, "internal invariant violated: {what}"),
        }
    }
}

impl std::error::Error for WmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::BadImage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ImageError> for WmError {
    fn from(e: ImageError) -> Self {
        Self::BadImage(e)
    }
}
