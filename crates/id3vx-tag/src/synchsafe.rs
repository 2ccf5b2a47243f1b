//! Synchsafe integers and the unsynchronization scheme.
//!
//! A synchsafe integer stores 28 bits across 4 bytes, 7 bits each, so that no
//! byte of a size field can look like an MPEG sync marker. Unsynchronization
//! does the same for arbitrary tag data by stuffing a `0x00` after `0xFF`.

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{Result, TagError};

/// Largest value a 4-byte synchsafe integer can hold (2^28 - 1).
pub const MAX_SYNCHSAFE: u32 = 0x0FFF_FFFF;

/// Decode a 4-byte synchsafe integer, most significant byte first.
pub fn decode(bytes: [u8; 4]) -> Result<u32> {
    bytes.iter().enumerate().try_fold(0u32, |acc, (index, &byte)| {
        if byte & 0x80 != 0 {
            return Err(TagError::InvalidSynchsafe { byte, index });
        }
        Ok((acc << 7) | u32::from(byte))
    })
}

/// Encode a value as a 4-byte synchsafe integer.
pub fn encode(value: u32) -> Result<[u8; 4]> {
    if value > MAX_SYNCHSAFE {
        return Err(TagError::SynchsafeOutOfRange(value));
    }
    Ok([
        ((value >> 21) & 0x7F) as u8,
        ((value >> 14) & 0x7F) as u8,
        ((value >> 7) & 0x7F) as u8,
        (value & 0x7F) as u8,
    ])
}

/// Plain big-endian `u32`, as used by the extended header and chapter timings.
pub fn decode_u32_be(bytes: [u8; 4]) -> u32 {
    u32::from_be_bytes(bytes)
}

/// Undo unsynchronization: drop the `0x00` of every `0xFF 0x00` pair.
///
/// The byte following a removed `0x00` is never itself dropped, so
/// `FF 00 00` restores to `FF 00`.
pub fn remove_unsynchronization(data: &[u8]) -> Bytes {
    let mut out = BytesMut::with_capacity(data.len());
    let mut after_ff = false;
    for &byte in data {
        if after_ff && byte == 0x00 {
            after_ff = false;
            continue;
        }
        out.put_u8(byte);
        after_ff = byte == 0xFF;
    }
    out.freeze()
}

/// Apply unsynchronization: stuff a `0x00` after every `0xFF` that is followed
/// by `0x00` or a byte with its top three bits set, and after a trailing `0xFF`.
pub fn apply_unsynchronization(data: &[u8]) -> Bytes {
    let mut out = BytesMut::with_capacity(data.len() + data.len() / 8);
    for (i, &byte) in data.iter().enumerate() {
        out.put_u8(byte);
        if byte != 0xFF {
            continue;
        }
        match data.get(i + 1) {
            Some(&next) if next == 0x00 || next >= 0xE0 => out.put_u8(0x00),
            None => out.put_u8(0x00),
            _ => {}
        }
    }
    out.freeze()
}
