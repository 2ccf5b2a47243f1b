use std::fmt;

use bitflags::bitflags;

use crate::error::{Result, TagError};
use crate::synchsafe;

/// Frame header: id (4) + synchsafe size (4) + flags (2) = 10 bytes.
pub const FRAME_HEADER_SIZE: usize = 10;

bitflags! {
    /// Frame status and format flags (`%abc00000 %ijk00000`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FrameFlags: u16 {
        /// Discard the frame if the tag is altered.
        const TAG_ALTER_PRESERVATION = 0x8000;
        /// Discard the frame if the file is altered.
        const FILE_ALTER_PRESERVATION = 0x4000;
        const READ_ONLY = 0x2000;
        /// Body is zlib-compressed, prefixed by its decompressed size.
        const COMPRESSION = 0x0080;
        /// Body is encrypted, prefixed by the method symbol.
        const ENCRYPTION = 0x0040;
        /// Body is prefixed by a group identifier byte.
        const GROUPING_IDENTITY = 0x0020;
    }
}

/// Four-character frame identifier (`TIT2`, `COMM`, ...).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId([u8; 4]);

impl FrameId {
    /// Validate an id: every byte must be `A-Z` or `0-9`.
    pub fn new(bytes: [u8; 4]) -> Result<Self> {
        if bytes
            .iter()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        {
            Ok(Self(bytes))
        } else {
            Err(TagError::InvalidFrameId(bytes))
        }
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        // Validated as ASCII on construction.
        std::str::from_utf8(&self.0).unwrap_or("????")
    }

    pub fn starts_with(&self, prefix: u8) -> bool {
        self.0[0] == prefix
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FrameId({})", self.as_str())
    }
}

impl PartialEq<&str> for FrameId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == other.as_bytes()
    }
}

/// The 10-byte header that precedes every frame body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub id: FrameId,
    /// Body size, excluding this header.
    pub size: u32,
    pub flags: FrameFlags,
}

impl FrameHeader {
    /// Parse a frame header.
    ///
    /// Returns `Ok(None)` when the id is all zero bytes: padding starts here.
    pub fn parse(bytes: &[u8; FRAME_HEADER_SIZE]) -> Result<Option<Self>> {
        let id = [bytes[0], bytes[1], bytes[2], bytes[3]];
        if id == [0; 4] {
            return Ok(None);
        }

        let id = FrameId::new(id)?;
        let size = synchsafe::decode([bytes[4], bytes[5], bytes[6], bytes[7]])?;
        let flags = FrameFlags::from_bits_retain(u16::from_be_bytes([bytes[8], bytes[9]]));

        Ok(Some(Self { id, size, flags }))
    }

    /// Encode this header back into its 10-byte form.
    pub fn to_bytes(&self) -> Result<[u8; FRAME_HEADER_SIZE]> {
        let size = synchsafe::encode(self.size)?;
        let flags = self.flags.bits().to_be_bytes();
        let id = self.id.as_bytes();
        Ok([
            id[0], id[1], id[2], id[3], size[0], size[1], size[2], size[3], flags[0], flags[1],
        ])
    }

    /// Total bytes occupied by the frame, header included.
    pub fn frame_size(&self) -> usize {
        FRAME_HEADER_SIZE + self.size as usize
    }

    pub fn compressed(&self) -> bool {
        self.flags.contains(FrameFlags::COMPRESSION)
    }

    pub fn encrypted(&self) -> bool {
        self.flags.contains(FrameFlags::ENCRYPTION)
    }

    pub fn grouped(&self) -> bool {
        self.flags.contains(FrameFlags::GROUPING_IDENTITY)
    }
}
