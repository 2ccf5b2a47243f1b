//! Frames: the typed records that make up a tag.

pub mod body;
pub mod header;
pub mod names;

use bytes::Bytes;

use crate::text::TextEncoding;

pub use body::decode_frame;
pub use header::{FrameFlags, FrameHeader, FrameId, FRAME_HEADER_SIZE};
pub use names::{declared_name, display_name, PictureType};

/// A decoded frame: its header plus a typed body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub header: FrameHeader,
    /// Group identifier byte, present when the grouping flag is set.
    pub group_id: Option<u8>,
    pub body: FrameBody,
}

impl Frame {
    pub fn id(&self) -> FrameId {
        self.header.id
    }

    /// Declared name of this frame, or its id when it is not a declared frame.
    pub fn name(&self) -> &str {
        display_name(self.header.id.as_str())
    }

    /// True when the body was decoded into a typed layout.
    pub fn is_decoded(&self) -> bool {
        !matches!(self.body, FrameBody::Unknown(_))
    }

    /// The primary text of text-bearing frames.
    pub fn text(&self) -> Option<&str> {
        match &self.body {
            FrameBody::Text(f) => Some(&f.text),
            FrameBody::UserText(f) => Some(&f.value),
            FrameBody::Comment(f) | FrameBody::Lyrics(f) => Some(&f.text),
            FrameBody::Url(f) => Some(&f.url),
            FrameBody::UserUrl(f) => Some(&f.url),
            FrameBody::TermsOfUse(f) => Some(&f.text),
            _ => None,
        }
    }
}

/// Frame body, one variant per decoded layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameBody {
    /// `T000`-`TZZZ`, except `TXXX`, and the `XSOA`/`XSOP`/`XSOT` sort orders.
    Text(TextFrame),
    /// `TXXX`.
    UserText(UserTextFrame),
    /// `W000`-`WZZZ`, except `WXXX`.
    Url(UrlFrame),
    /// `WXXX`.
    UserUrl(UserUrlFrame),
    /// `COMM`.
    Comment(CommentFrame),
    /// `USLT`, same layout as a comment.
    Lyrics(CommentFrame),
    /// `APIC`.
    Picture(PictureFrame),
    /// `GEOB`.
    Object(ObjectFrame),
    /// `USER`.
    TermsOfUse(TermsOfUseFrame),
    /// `PRIV` and `UFID`.
    Private(PrivateFrame),
    /// `PCNT`.
    PlayCounter(PlayCounterFrame),
    /// `CHAP`.
    Chapter(ChapterFrame),
    /// Anything not decoded, raw bytes preserved.
    Unknown(UnknownFrame),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFrame {
    pub encoding: TextEncoding,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserTextFrame {
    pub encoding: TextEncoding,
    pub description: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlFrame {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserUrlFrame {
    pub encoding: TextEncoding,
    pub description: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentFrame {
    pub encoding: TextEncoding,
    /// ISO-639-2 language code, kept as raw bytes.
    pub language: [u8; 3],
    pub description: String,
    pub text: String,
}

impl CommentFrame {
    /// Language code as text; non-ASCII bytes are replaced.
    pub fn language_code(&self) -> String {
        String::from_utf8_lossy(&self.language).into_owned()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PictureFrame {
    pub encoding: TextEncoding,
    pub mime_type: String,
    pub picture_type: u8,
    pub description: String,
    pub data: Bytes,
}

impl PictureFrame {
    pub fn kind(&self) -> PictureType {
        PictureType::from_code(self.picture_type)
    }
}

/// General encapsulated object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectFrame {
    pub encoding: TextEncoding,
    pub mime_type: String,
    pub filename: String,
    pub description: String,
    pub data: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermsOfUseFrame {
    pub encoding: TextEncoding,
    pub language: [u8; 3],
    pub text: String,
}

impl TermsOfUseFrame {
    pub fn language_code(&self) -> String {
        String::from_utf8_lossy(&self.language).into_owned()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivateFrame {
    pub owner: String,
    pub data: Bytes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayCounterFrame {
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterFrame {
    pub element_id: String,
    pub start_ms: u32,
    pub end_ms: u32,
    /// Byte offset of the chapter start, `0xFFFFFFFF` when unused.
    pub start_offset: u32,
    pub end_offset: u32,
    /// Embedded frames, usually `TIT2`/`TIT3`.
    pub sub_frames: Vec<Frame>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFrame {
    pub data: Bytes,
    pub reason: RawReason,
}

/// Why a frame body was kept raw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawReason {
    /// No decoder exists for this frame id.
    Unsupported,
    /// The compression flag is set.
    Compressed,
    /// The encryption flag is set.
    Encrypted,
    /// Structured decoding failed.
    Malformed(String),
}

impl std::fmt::Display for RawReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawReason::Unsupported => f.write_str("unsupported frame"),
            RawReason::Compressed => f.write_str("compressed frame"),
            RawReason::Encrypted => f.write_str("encrypted frame"),
            RawReason::Malformed(reason) => write!(f, "malformed frame: {reason}"),
        }
    }
}
