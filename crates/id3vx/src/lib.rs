//! Inspect ID3v2.3 tags of MP3 files.
//!
//! # Crate Structure
//!
//! - [`tag`]: tag decoding with synchsafe sizes, text encodings and typed frames
//!
//! The `id3vx` binary (behind the `cli` feature) dumps decoded tags as JSON,
//! tables or plain text.

/// Re-export tag decoding types.
pub mod tag {
    pub use id3vx_tag::*;
}

pub use id3vx_tag::{Frame, FrameBody, Tag, TagConfig, TagError, TagReader};
