/// Default maximum frame body size: 16 MiB.
pub const DEFAULT_MAX_FRAME_SIZE: usize = 16 * 1024 * 1024;

/// Default number of `CHAP` frames that may enclose another `CHAP`.
pub const DEFAULT_MAX_CHAPTER_DEPTH: usize = 4;

/// Controls how lenient tag parsing is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagConfig {
    /// Frames declaring a larger body end iteration as malformed.
    pub max_frame_size: usize,
    /// When true, a frame whose header lies inside the declared tag but whose
    /// body runs past it is still read if the buffer holds the bytes.
    ///
    /// At most `max_frame_size` bytes past the declared end are considered.
    /// [`TagReader`](crate::TagReader) reads further from its source until
    /// the overrunning body is complete or that bound is reached.
    pub allow_frame_overrun: bool,
    /// When true, frames embedded in `CHAP` bodies are decoded.
    pub decode_chapter_sub_frames: bool,
    /// A `CHAP` frame found inside more than this many enclosing `CHAP`
    /// frames is kept undecoded.
    pub max_chapter_depth: usize,
}

impl Default for TagConfig {
    fn default() -> Self {
        Self {
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
            allow_frame_overrun: true,
            decode_chapter_sub_frames: true,
            max_chapter_depth: DEFAULT_MAX_CHAPTER_DEPTH,
        }
    }
}
