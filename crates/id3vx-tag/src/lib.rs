//! ID3v2.3 tag decoding.
//!
//! A tag sits at the very start of an MP3 file:
//! - A 10-byte header: "ID3", version, flags and a synchsafe body size
//! - An optional extended header
//! - A sequence of frames, each with a 10-byte header and a typed body
//! - Optional zero padding up to the declared size
//!
//! Parsing is a pure function over a byte buffer. Header problems are errors;
//! frame problems are recovered locally so one bad frame never hides the rest.

pub mod config;
pub mod error;
pub mod frame;
pub mod header;
pub mod reader;
pub mod synchsafe;
pub mod tag;
pub mod text;

pub use config::{TagConfig, DEFAULT_MAX_CHAPTER_DEPTH, DEFAULT_MAX_FRAME_SIZE};
pub use error::{ErrorKind, Result, TagError};
pub use frame::{
    declared_name, decode_frame, ChapterFrame, CommentFrame, Frame, FrameBody, FrameFlags,
    FrameHeader, FrameId, ObjectFrame, PictureFrame, PictureType, PlayCounterFrame, PrivateFrame,
    RawReason, TermsOfUseFrame, TextFrame, UnknownFrame, UrlFrame, UserTextFrame, UserUrlFrame,
    FRAME_HEADER_SIZE,
};
pub use header::{ExtendedHeader, TagFlags, TagHeader, HEADER_SIZE};
pub use reader::TagReader;
pub use tag::{Tag, Termination};
pub use text::TextEncoding;
