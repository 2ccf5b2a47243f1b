//! Text encodings used by ID3v2.3 frames.

use std::fmt;

use crate::error::{Result, TagError};

/// Encoding selected by the one-byte marker that opens most text-bearing frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextEncoding {
    /// ISO-8859-1, terminated by `00`.
    Latin1,
    /// UTF-16 with byte order mark, terminated by `00 00`.
    Utf16,
    /// UTF-16 big-endian without BOM, terminated by `00 00`.
    Utf16Be,
    /// UTF-8, terminated by `00`.
    Utf8,
}

impl TextEncoding {
    /// Map an encoding marker byte to its scheme.
    pub fn resolve(marker: u8) -> Result<Self> {
        match marker {
            0 => Ok(TextEncoding::Latin1),
            1 => Ok(TextEncoding::Utf16),
            2 => Ok(TextEncoding::Utf16Be),
            3 => Ok(TextEncoding::Utf8),
            other => Err(TagError::UnknownEncoding(other)),
        }
    }

    pub fn marker(self) -> u8 {
        match self {
            TextEncoding::Latin1 => 0,
            TextEncoding::Utf16 => 1,
            TextEncoding::Utf16Be => 2,
            TextEncoding::Utf8 => 3,
        }
    }

    /// Width of one code unit, which is also the terminator length.
    pub fn unit_width(self) -> usize {
        match self {
            TextEncoding::Latin1 | TextEncoding::Utf8 => 1,
            TextEncoding::Utf16 | TextEncoding::Utf16Be => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TextEncoding::Latin1 => "ISO-8859-1",
            TextEncoding::Utf16 => "UTF-16",
            TextEncoding::Utf16Be => "UTF-16BE",
            TextEncoding::Utf8 => "UTF-8",
        }
    }

    /// Decode up to the first terminator, or the whole buffer if there is none.
    pub fn decode(self, bytes: &[u8]) -> Result<String> {
        let end = self.find_terminator(bytes).unwrap_or(bytes.len());
        self.decode_exact(&bytes[..end])
    }

    /// Split off the first terminated string and return the bytes after its
    /// terminator.
    pub fn split(self, bytes: &[u8]) -> Result<(String, &[u8])> {
        self.split_field(bytes, "text string")
    }

    pub(crate) fn split_field<'a>(
        self,
        bytes: &'a [u8],
        field: &'static str,
    ) -> Result<(String, &'a [u8])> {
        let end = self
            .find_terminator(bytes)
            .ok_or(TagError::MissingTerminator(field))?;
        let text = self.decode_exact(&bytes[..end])?;
        Ok((text, &bytes[end + self.unit_width()..]))
    }

    /// Encode text, optionally followed by the terminator.
    ///
    /// UTF-16 output carries a little-endian BOM.
    pub fn encode(self, text: &str, terminated: bool) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(text.len() * self.unit_width() + 4);
        match self {
            TextEncoding::Latin1 => {
                for ch in text.chars() {
                    let code = u32::from(ch);
                    if code > 0xFF {
                        return Err(TagError::Unencodable(ch));
                    }
                    out.push(code as u8);
                }
            }
            TextEncoding::Utf8 => out.extend_from_slice(text.as_bytes()),
            TextEncoding::Utf16 => {
                out.extend_from_slice(&[0xFF, 0xFE]);
                for unit in text.encode_utf16() {
                    out.extend_from_slice(&unit.to_le_bytes());
                }
            }
            TextEncoding::Utf16Be => {
                for unit in text.encode_utf16() {
                    out.extend_from_slice(&unit.to_be_bytes());
                }
            }
        }
        if terminated {
            out.extend(std::iter::repeat_n(0u8, self.unit_width()));
        }
        Ok(out)
    }

    fn find_terminator(self, bytes: &[u8]) -> Option<usize> {
        match self.unit_width() {
            1 => bytes.iter().position(|&b| b == 0),
            _ => bytes
                .chunks_exact(2)
                .position(|unit| unit == [0, 0])
                .map(|i| i * 2),
        }
    }

    fn decode_exact(self, bytes: &[u8]) -> Result<String> {
        match self {
            TextEncoding::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
            TextEncoding::Utf8 => std::str::from_utf8(bytes)
                .map(str::to_owned)
                .map_err(|_| self.invalid()),
            TextEncoding::Utf16 => match bytes {
                [0xFE, 0xFF, rest @ ..] => self.decode_utf16(rest, u16::from_be_bytes),
                [0xFF, 0xFE, rest @ ..] => self.decode_utf16(rest, u16::from_le_bytes),
                _ => self.decode_utf16(bytes, u16::from_le_bytes),
            },
            TextEncoding::Utf16Be => self.decode_utf16(bytes, u16::from_be_bytes),
        }
    }

    fn decode_utf16(self, bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String> {
        if bytes.len() % 2 != 0 {
            return Err(self.invalid());
        }
        let units = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));
        char::decode_utf16(units)
            .collect::<std::result::Result<String, _>>()
            .map_err(|_| self.invalid())
    }

    fn invalid(self) -> TagError {
        TagError::InvalidText {
            encoding: self.name(),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
