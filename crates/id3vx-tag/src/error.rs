/// Errors that can occur while decoding an ID3v2.3 tag.
#[derive(Debug, thiserror::Error)]
pub enum TagError {
    /// The buffer does not start with the "ID3" magic.
    #[error("not an ID3 tag")]
    NotId3,

    /// The tag declares a major version other than 3.
    #[error("unsupported ID3 version 2.{major}.{minor}")]
    UnsupportedVersion { major: u8, minor: u8 },

    /// A synchsafe integer byte has its high bit set.
    #[error("invalid synchsafe byte 0x{byte:02X} at index {index}")]
    InvalidSynchsafe { byte: u8, index: usize },

    /// A value does not fit in 28 bits.
    #[error("value {0} exceeds synchsafe range (max 268435455)")]
    SynchsafeOutOfRange(u32),

    /// The text encoding marker is not one of 0-3.
    #[error("unknown text encoding marker 0x{0:02X}")]
    UnknownEncoding(u8),

    /// A character cannot be represented in the requested encoding.
    #[error("character {0:?} cannot be encoded as ISO-8859-1")]
    Unencodable(char),

    /// A frame id contains bytes outside `A-Z0-9`.
    #[error("invalid frame id {0:02X?}")]
    InvalidFrameId([u8; 4]),

    /// A terminated string field has no terminator.
    #[error("missing terminator for {0}")]
    MissingTerminator(&'static str),

    /// Text bytes are not valid in their declared encoding.
    #[error("invalid {encoding} text")]
    InvalidText { encoding: &'static str },

    /// The frame declares more bytes than the configured limit.
    #[error("frame too large ({size} bytes, max {max})")]
    FrameTooLarge { size: usize, max: usize },

    /// A `CHAP` frame is nested deeper than the configured limit.
    #[error("chapter nested {depth} levels deep (max {max})")]
    ChapterTooDeep { depth: usize, max: usize },

    /// The buffer is shorter than a field requires.
    #[error("truncated {field} ({needed} bytes needed, {available} available)")]
    Truncated {
        field: &'static str,
        needed: usize,
        available: usize,
    },

    /// An I/O error occurred while reading tag bytes.
    #[error("tag I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of a [`TagError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed structural data.
    Format,
    /// The buffer is shorter than a declared field requires.
    Truncation,
    /// A value is outside its encodable range.
    Range,
    /// Reading bytes from the underlying source failed.
    Io,
}

impl TagError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TagError::Truncated { .. } => ErrorKind::Truncation,
            TagError::SynchsafeOutOfRange(_) | TagError::Unencodable(_) => ErrorKind::Range,
            TagError::Io(_) => ErrorKind::Io,
            _ => ErrorKind::Format,
        }
    }

    pub(crate) fn truncated(field: &'static str, needed: usize, available: usize) -> Self {
        TagError::Truncated {
            field,
            needed,
            available,
        }
    }
}

pub type Result<T> = std::result::Result<T, TagError>;
