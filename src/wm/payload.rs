// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/sgpcore

//! The 32-byte ownership payload.
//!
//! Layout (all integers big-endian):
//!
//! ```text
//! [0..4)   magic       0x53475001 ("SGP\x01")
//! [4..8)   crc32       CRC-32/IEEE of bytes [8..32)
//! [8..20)  original_uid  owner identity, 96-bit unsigned
//! [20..30) current_uid   holder identity, 80-bit unsigned; 0 = master
//! [30]     flags       bit 0 = allow_derivative, bit 1 = allow_reprint
//! [31]     reserved    written 0
//! ```
//!
//! Deserialization never panics on arbitrary input: a wrong length, magic or
//! CRC yields an [`InvalidPayload`] value, which extraction reports as
//! "no payload". Reserved bits are ignored on read unless strict validation
//! is enabled.

use core::fmt;

use crate::wm::error::WmError;

/// Protocol tag at the head of every payload.
pub const PROTOCOL_MAGIC: u32 = 0x5347_5001;

/// Serialized payload length in bytes.
pub const PAYLOAD_LEN: usize = 32;

/// Holder UID of a master copy.
pub const NULL_UID: u128 = 0;

/// Bit width of the owner UID field.
pub const ORIGINAL_UID_BITS: u32 = 96;

/// Bit width of the holder UID field.
pub const CURRENT_UID_BITS: u32 = 80;

/// Why a 32-byte buffer failed payload validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidPayload {
    /// Input is not exactly 32 bytes.
    BadLength,
    /// The magic tag does not match.
    BadMagic,
    /// The stored CRC does not match the recomputed one.
    BadCrc,
    /// Strict mode: reserved flag bits or the reserved byte are nonzero.
    ReservedBits,
}

impl fmt::Display for InvalidPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadLength => write!(f, "payload length is not 32 bytes"),
            Self::BadMagic => write!(f, "magic mismatch"),
            Self::BadCrc => write!(f, "crc mismatch"),
            Self::ReservedBits => write!(f, "reserved bits set"),
        }
    }
}

/// The decoded ownership record.
///
/// Records are constructed by the DRM layer and never mutated after
/// construction; distribution minting builds a fresh record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatermarkPayload {
    pub original_uid: u128,
    pub current_uid: u128,
    pub allow_derivative: bool,
    pub allow_reprint: bool,
}

impl WatermarkPayload {
    /// A master record: holder UID zero.
    pub fn master(owner_uid: u128, allow_derivative: bool, allow_reprint: bool) -> Self {
        Self {
            original_uid: owner_uid,
            current_uid: NULL_UID,
            allow_derivative,
            allow_reprint,
        }
    }

    /// The distribution record derived from this master for a recipient.
    pub fn distribution(&self, recipient_uid: u128) -> Self {
        Self {
            original_uid: self.original_uid,
            current_uid: recipient_uid,
            allow_derivative: self.allow_derivative,
            allow_reprint: self.allow_reprint,
        }
    }

    /// Whether this record marks a master copy.
    pub fn is_master(&self) -> bool {
        self.current_uid == NULL_UID
    }

    /// Serialize to the 32-byte wire form.
    ///
    /// Fails with [`WmError::UidOverflow`] if a UID does not fit its field.
    pub fn to_bytes(&self) -> Result<[u8; PAYLOAD_LEN], WmError> {
        if self.original_uid >> ORIGINAL_UID_BITS != 0 {
            return Err(WmError::UidOverflow {
                uid: self.original_uid,
                max_bits: ORIGINAL_UID_BITS,
            });
        }
        if self.current_uid >> CURRENT_UID_BITS != 0 {
            return Err(WmError::UidOverflow {
                uid: self.current_uid,
                max_bits: CURRENT_UID_BITS,
            });
        }

        let mut buf = [0u8; PAYLOAD_LEN];
        buf[0..4].copy_from_slice(&PROTOCOL_MAGIC.to_be_bytes());
        buf[8..20].copy_from_slice(&self.original_uid.to_be_bytes()[4..16]);
        buf[20..30].copy_from_slice(&self.current_uid.to_be_bytes()[6..16]);
        buf[30] = (self.allow_derivative as u8) | ((self.allow_reprint as u8) << 1);
        buf[31] = 0;

        let crc = crc32fast::hash(&buf[8..PAYLOAD_LEN]);
        buf[4..8].copy_from_slice(&crc.to_be_bytes());
        Ok(buf)
    }

    /// Validate and parse a 32-byte buffer.
    pub fn from_bytes(data: &[u8], strict: bool) -> Result<Self, InvalidPayload> {
        if data.len() != PAYLOAD_LEN {
            return Err(InvalidPayload::BadLength);
        }
        let magic = u32::from_be_bytes([data[0], data[1], data[2], data[3]]);
        if magic != PROTOCOL_MAGIC {
            return Err(InvalidPayload::BadMagic);
        }
        let stored_crc = u32::from_be_bytes([data[4], data[5], data[6], data[7]]);
        if stored_crc != crc32fast::hash(&data[8..PAYLOAD_LEN]) {
            return Err(InvalidPayload::BadCrc);
        }

        let flags = data[30];
        if strict && (flags & !0b11 != 0 || data[31] != 0) {
            return Err(InvalidPayload::ReservedBits);
        }

        let mut wide = [0u8; 16];
        wide[4..16].copy_from_slice(&data[8..20]);
        let original_uid = u128::from_be_bytes(wide);

        let mut wide = [0u8; 16];
        wide[6..16].copy_from_slice(&data[20..30]);
        let current_uid = u128::from_be_bytes(wide);

        Ok(Self {
            original_uid,
            current_uid,
            allow_derivative: flags & 0b01 != 0,
            allow_reprint: flags & 0b10 != 0,
        })
    }
}

/// Expand bytes into bits, MSB first within each byte.
pub fn bytes_to_bits(bytes: &[u8]) -> Vec<u8> {
    let mut bits = Vec::with_capacity(bytes.len() * 8);
    for &byte in bytes {
        for bit_pos in (0..8).rev() {
            bits.push((byte >> bit_pos) & 1);
        }
    }
    bits
}

/// Pack bits (MSB first) back into bytes.
pub fn bits_to_bytes(bits: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(bits.len() / 8);
    for chunk in bits.chunks(8) {
        let mut byte = 0u8;
        for (i, &bit) in chunk.iter().enumerate() {
            byte |= (bit & 1) << (7 - i);
        }
        bytes.push(byte);
    }
    bytes
}
