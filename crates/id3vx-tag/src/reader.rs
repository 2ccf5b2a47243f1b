use std::io::{ErrorKind, Read};

use bytes::BytesMut;
use tracing::debug;

use crate::config::TagConfig;
use crate::error::{Result, TagError};
use crate::header::{TagHeader, HEADER_SIZE};
use crate::tag::Tag;

const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Reads a complete tag from any `Read` source.
///
/// Only the tag header and the declared tag body are read; audio data that
/// follows is left in the source, apart from a look-ahead used when the last
/// frame overruns the declared size. The look-ahead grows until that frame is
/// complete, bounded by `max_frame_size` past the declared end.
pub struct TagReader<T> {
    inner: T,
    config: TagConfig,
}

impl<T: Read> TagReader<T> {
    /// Create a new tag reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, TagConfig::default())
    }

    /// Create a new tag reader with explicit configuration.
    pub fn with_config(inner: T, config: TagConfig) -> Self {
        Self { inner, config }
    }

    /// Read and decode the tag at the current position of the source.
    ///
    /// A source that ends inside the tag body is not an error: the partial
    /// buffer is decoded and the truncated frame discarded.
    pub fn read_tag(&mut self) -> Result<Tag> {
        let mut buf = BytesMut::with_capacity(READ_CHUNK_SIZE);
        self.fill(&mut buf, HEADER_SIZE)?;
        if buf.len() < HEADER_SIZE {
            return Err(TagError::truncated("tag header", HEADER_SIZE, buf.len()));
        }

        let header = TagHeader::parse_prefix(&buf)?;
        let mut wanted = header.tag_size();
        if self.config.allow_frame_overrun {
            wanted += READ_CHUNK_SIZE;
        }
        self.fill(&mut buf, wanted)?;

        let mut tag = Tag::parse_with_config(&buf, &self.config)?;
        let limit = header
            .tag_size()
            .saturating_add(self.config.max_frame_size);
        while let Some(missing) = tag.overrun_shortfall() {
            let before = buf.len();
            self.fill(&mut buf, before.saturating_add(missing).min(limit))?;
            if buf.len() == before {
                break;
            }
            debug!(missing, read = buf.len() - before, "extended overrun look-ahead");
            tag = Tag::parse_with_config(&buf, &self.config)?;
        }
        Ok(tag)
    }

    /// Read until `buf` holds `target` bytes or the source is exhausted.
    fn fill(&mut self, buf: &mut BytesMut, target: usize) -> Result<()> {
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        while buf.len() < target {
            let want = (target - buf.len()).min(READ_CHUNK_SIZE);
            let read = match self.inner.read(&mut chunk[..want]) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(TagError::Io(err)),
            };
            if read == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..read]);
        }
        Ok(())
    }

    /// Borrow the underlying source.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Consume the reader and return the inner source.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current reader configuration.
    pub fn config(&self) -> &TagConfig {
        &self.config
    }
}
