use bitflags::bitflags;

use crate::error::{Result, TagError};
use crate::synchsafe;

/// Tag header: magic (3) + version (2) + flags (1) + synchsafe size (4) = 10 bytes.
pub const HEADER_SIZE: usize = 10;

/// Magic bytes: "ID3".
pub const MAGIC: [u8; 3] = *b"ID3";

/// The only major version this crate decodes.
pub const SUPPORTED_MAJOR: u8 = 3;

bitflags! {
    /// Tag-level flags (`%abc00000`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TagFlags: u8 {
        /// Tag body has been unsynchronized.
        const UNSYNCHRONIZATION = 0b1000_0000;
        /// An extended header follows the tag header.
        const EXTENDED_HEADER = 0b0100_0000;
        /// Tag is in an experimental stage.
        const EXPERIMENTAL = 0b0010_0000;
    }
}

/// The 10-byte header at the very start of a tagged file.
///
/// Layout:
/// ```text
/// ┌──────────┬─────────────┬─────────┬──────────────────────┐
/// │ "ID3"    │ Version     │ Flags   │ Size                 │
/// │ (3B)     │ (2B: 03 xx) │ (1B)    │ (4B synchsafe)       │
/// └──────────┴─────────────┴─────────┴──────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagHeader {
    pub major: u8,
    pub minor: u8,
    pub flags: TagFlags,
    /// Size of the tag body, excluding this header.
    pub size: u32,
}

impl TagHeader {
    /// Parse a tag header from exactly 10 bytes.
    pub fn parse(bytes: &[u8; HEADER_SIZE]) -> Result<Self> {
        if bytes[0..3] != MAGIC {
            return Err(TagError::NotId3);
        }

        let major = bytes[3];
        let minor = bytes[4];
        if major != SUPPORTED_MAJOR {
            return Err(TagError::UnsupportedVersion { major, minor });
        }

        let flags = TagFlags::from_bits_retain(bytes[5]);
        let size = synchsafe::decode([bytes[6], bytes[7], bytes[8], bytes[9]])?;

        Ok(Self {
            major,
            minor,
            flags,
            size,
        })
    }

    /// Parse the header at the start of `buf`.
    pub fn parse_prefix(buf: &[u8]) -> Result<Self> {
        let bytes: &[u8; HEADER_SIZE] = buf
            .get(..HEADER_SIZE)
            .and_then(|b| b.try_into().ok())
            .ok_or_else(|| TagError::truncated("tag header", HEADER_SIZE, buf.len()))?;
        Self::parse(bytes)
    }

    /// Encode this header back into its 10-byte form.
    pub fn to_bytes(&self) -> Result<[u8; HEADER_SIZE]> {
        let size = synchsafe::encode(self.size)?;
        Ok([
            MAGIC[0],
            MAGIC[1],
            MAGIC[2],
            self.major,
            self.minor,
            self.flags.bits(),
            size[0],
            size[1],
            size[2],
            size[3],
        ])
    }

    pub fn unsynchronized(&self) -> bool {
        self.flags.contains(TagFlags::UNSYNCHRONIZATION)
    }

    pub fn has_extended_header(&self) -> bool {
        self.flags.contains(TagFlags::EXTENDED_HEADER)
    }

    pub fn experimental(&self) -> bool {
        self.flags.contains(TagFlags::EXPERIMENTAL)
    }

    /// Overall tag size including this header.
    pub fn tag_size(&self) -> usize {
        HEADER_SIZE + self.size as usize
    }
}

/// Extended header flag: a CRC-32 of the frame data follows.
pub const EXTENDED_CRC_PRESENT: u16 = 0x8000;

/// Optional extended header that follows the tag header when flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtendedHeader {
    /// Size excluding the 4-byte size field itself (6 or 10).
    pub size: u32,
    pub flags: u16,
    pub padding_size: u32,
    pub crc: Option<u32>,
}

impl ExtendedHeader {
    /// Parse the extended header from the start of the (synchronized) tag body.
    pub fn parse(buf: &[u8]) -> Result<Self> {
        let size = read_u32(buf, 0, "extended header size")?;
        let total = 4usize.saturating_add(size as usize);
        if buf.len() < total {
            return Err(TagError::truncated("extended header", total, buf.len()));
        }
        if size < 6 {
            return Err(TagError::truncated("extended header", 10, total));
        }

        let flags = u16::from_be_bytes([buf[4], buf[5]]);
        let padding_size = read_u32(buf, 6, "extended header padding")?;
        let crc = if flags & EXTENDED_CRC_PRESENT != 0 {
            Some(read_u32(buf, 10, "extended header CRC")?)
        } else {
            None
        };

        Ok(Self {
            size,
            flags,
            padding_size,
            crc,
        })
    }

    /// Bytes occupied in the tag body, including the size field.
    pub fn total_size(&self) -> usize {
        4 + self.size as usize
    }
}

fn read_u32(buf: &[u8], at: usize, field: &'static str) -> Result<u32> {
    buf.get(at..at + 4)
        .and_then(|b| b.try_into().ok())
        .map(synchsafe::decode_u32_be)
        .ok_or_else(|| TagError::truncated(field, at + 4, buf.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_bytes(flags: u8, size: [u8; 4]) -> [u8; HEADER_SIZE] {
        [
            b'I', b'D', b'3', 3, 0, flags, size[0], size[1], size[2], size[3],
        ]
    }

    #[test]
    fn parses_valid_header() {
        let header = TagHeader::parse(&header_bytes(0, [0, 0, 0x02, 0x01])).unwrap();
        assert_eq!((header.major, header.minor), (3, 0));
        assert_eq!(header.size, 257);
        assert_eq!(header.tag_size(), 267);
        assert!(!header.unsynchronized());
    }

    #[test]
    fn rejects_bad_magic() {
        let mut bytes = header_bytes(0, [0, 0, 0, 15]);
        bytes[..3].copy_from_slice(b"XYZ");
        let err = TagHeader::parse(&bytes).unwrap_err();
        assert!(matches!(err, TagError::NotId3));
        assert_eq!(err.to_string(), "not an ID3 tag");
    }

    #[test]
    fn rejects_other_major_versions() {
        let mut bytes = header_bytes(0, [0, 0, 0, 15]);
        bytes[3] = 4;
        assert!(matches!(
            TagHeader::parse(&bytes),
            Err(TagError::UnsupportedVersion { major: 4, minor: 0 })
        ));
    }

    #[test]
    fn rejects_non_synchsafe_size() {
        let err = TagHeader::parse(&header_bytes(0, [0, 0, 0x80, 0])).unwrap_err();
        assert!(matches!(err, TagError::InvalidSynchsafe { .. }));
    }

    #[test]
    fn reads_flags_most_significant_first() {
        let header = TagHeader::parse(&header_bytes(0b1110_0000, [0; 4])).unwrap();
        assert!(header.unsynchronized());
        assert!(header.has_extended_header());
        assert!(header.experimental());
    }

    #[test]
    fn short_prefix_is_truncation() {
        let err = TagHeader::parse_prefix(b"ID3\x03").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Truncation);
    }

    #[test]
    fn header_encodes_back() {
        let bytes = header_bytes(0x40, [0, 0, 0x10, 0x7F]);
        let header = TagHeader::parse(&bytes).unwrap();
        assert_eq!(header.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn parses_extended_header_with_crc() {
        let buf = [
            0, 0, 0, 10, // size
            0x80, 0x00, // flags
            0, 0, 0x01, 0x00, // padding
            0xDE, 0xAD, 0xBE, 0xEF, // crc
        ];
        let ext = ExtendedHeader::parse(&buf).unwrap();
        assert_eq!(ext.padding_size, 256);
        assert_eq!(ext.crc, Some(0xDEAD_BEEF));
        assert_eq!(ext.total_size(), 14);
    }

    #[test]
    fn truncated_extended_header() {
        let err = ExtendedHeader::parse(&[0, 0, 0, 6, 0, 0]).unwrap_err();
        assert!(matches!(err, TagError::Truncated { .. }));
    }
}
