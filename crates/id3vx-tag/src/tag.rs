use bytes::{BufMut, Bytes, BytesMut};
use tracing::{debug, trace, warn};

use crate::config::TagConfig;
use crate::error::{ErrorKind, Result, TagError};
use crate::frame::body::decode_nested;
use crate::frame::{Frame, FrameHeader, FRAME_HEADER_SIZE};
use crate::header::{ExtendedHeader, TagHeader, HEADER_SIZE};
use crate::synchsafe::remove_unsynchronization;

/// Why frame iteration stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// The cursor reached the declared end of the tag.
    Exhausted,
    /// An all-zero frame id marked the start of padding.
    Padding { offset: usize },
    /// A frame header or body did not fit; the partial frame was discarded.
    Truncated { offset: usize },
    /// A frame header could not be decoded; the rest of the tag was skipped.
    Malformed { offset: usize, reason: String },
}

/// A decoded ID3v2.3 tag: header plus frames in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    header: TagHeader,
    extended_header: Option<ExtendedHeader>,
    frames: Vec<Frame>,
    termination: Termination,
    shortfall: Option<usize>,
}

impl Tag {
    /// Parse a tag from the start of `buf` with default configuration.
    pub fn parse(buf: &[u8]) -> Result<Self> {
        Self::parse_with_config(buf, &TagConfig::default())
    }

    /// Parse a tag from the start of `buf`.
    ///
    /// Only header-level problems are errors. Frame-level problems end up
    /// either in an undecoded frame or in [`Tag::termination`].
    pub fn parse_with_config(buf: &[u8], config: &TagConfig) -> Result<Self> {
        let header = TagHeader::parse_prefix(buf)?;
        debug!(
            major = header.major,
            minor = header.minor,
            size = header.size,
            flags = header.flags.bits(),
            "parsed tag header"
        );

        let declared_end = header.tag_size().min(buf.len());
        let raw_body = &buf[HEADER_SIZE..declared_end];
        let body = if header.unsynchronized() {
            remove_unsynchronization(raw_body)
        } else {
            Bytes::copy_from_slice(raw_body)
        };
        let raw_trailing: &[u8] = if config.allow_frame_overrun {
            let overrun_end = declared_end
                .saturating_add(config.max_frame_size)
                .min(buf.len());
            &buf[declared_end..overrun_end]
        } else {
            &[]
        };
        let restored_trailing: Bytes;
        let trailing: &[u8] = if header.unsynchronized() && !raw_trailing.is_empty() {
            // An `FF 00` pair may straddle the declared end.
            let skip = usize::from(raw_body.last() == Some(&0xFF) && raw_trailing[0] == 0x00);
            restored_trailing = remove_unsynchronization(&raw_trailing[skip..]);
            &restored_trailing
        } else {
            raw_trailing
        };

        let mut start = 0;
        let mut extended_header = None;
        if header.has_extended_header() {
            match ExtendedHeader::parse(&body) {
                Ok(ext) => {
                    start = ext.total_size();
                    extended_header = Some(ext);
                }
                Err(err) => {
                    warn!(error = %err, "unreadable extended header");
                    let termination = match err.kind() {
                        ErrorKind::Truncation => Termination::Truncated { offset: 0 },
                        _ => Termination::Malformed {
                            offset: 0,
                            reason: err.to_string(),
                        },
                    };
                    return Ok(Self {
                        header,
                        extended_header: None,
                        frames: Vec::new(),
                        termination,
                        shortfall: None,
                    });
                }
            }
        }

        let (frames, termination) = walk_frames(&body, start, trailing, config, 0);
        debug!(frames = frames.len(), ?termination, "parsed tag");

        let shortfall = match termination {
            Termination::Truncated { offset } if config.allow_frame_overrun => {
                overrun_shortfall(&body, trailing.len(), offset)
            }
            _ => None,
        };

        Ok(Self {
            header,
            extended_header,
            frames,
            termination,
            shortfall,
        })
    }

    pub fn header(&self) -> &TagHeader {
        &self.header
    }

    pub fn extended_header(&self) -> Option<&ExtendedHeader> {
        self.extended_header.as_ref()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn termination(&self) -> &Termination {
        &self.termination
    }

    /// Bytes missing from the end of the parsed buffer for the frame that
    /// stopped iteration by overrunning the declared tag size.
    ///
    /// `None` unless iteration ended [`Termination::Truncated`] on a frame
    /// whose header was complete.
    pub fn overrun_shortfall(&self) -> Option<usize> {
        self.shortfall
    }

    /// Overall tag size in bytes, header included.
    pub fn size(&self) -> usize {
        self.header.tag_size()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Frame> {
        self.frames.iter()
    }

    /// First frame with the given id.
    pub fn get(&self, id: &str) -> Option<&Frame> {
        self.frames.iter().find(|f| f.header.id == id)
    }

    /// All frames with the given id, in file order.
    pub fn get_all<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Frame> + 'a {
        self.frames.iter().filter(move |f| f.header.id == id)
    }

    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }
}

impl<'a> IntoIterator for &'a Tag {
    type Item = &'a Frame;
    type IntoIter = std::slice::Iter<'a, Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

/// Decode consecutive frames from `region`, starting at `start`.
///
/// Iteration stops when fewer than 10 bytes remain, at an all-zero id, at an
/// undecodable frame header, or when a body is not fully available. `trailing`
/// holds bytes past the end of `region` that a body may overrun into.
/// `depth` counts the `CHAP` frames enclosing `region`.
pub(crate) fn walk_frames(
    region: &Bytes,
    start: usize,
    trailing: &[u8],
    config: &TagConfig,
    depth: usize,
) -> (Vec<Frame>, Termination) {
    let mut frames = Vec::new();
    let mut pos = start;

    let termination = loop {
        if pos >= region.len() {
            break Termination::Exhausted;
        }

        let remaining = &region[pos..];
        let Some(raw) = remaining.first_chunk::<FRAME_HEADER_SIZE>() else {
            if remaining.iter().all(|&b| b == 0) {
                break Termination::Padding { offset: pos };
            }
            debug!(offset = pos, remaining = remaining.len(), "partial frame header");
            break Termination::Truncated { offset: pos };
        };

        let header = match FrameHeader::parse(raw) {
            Ok(Some(header)) => header,
            Ok(None) => {
                trace!(offset = pos, "padding reached");
                break Termination::Padding { offset: pos };
            }
            Err(err) => {
                warn!(offset = pos, error = %err, "undecodable frame header");
                break Termination::Malformed {
                    offset: pos,
                    reason: err.to_string(),
                };
            }
        };

        let size = header.size as usize;
        if size > config.max_frame_size {
            let err = TagError::FrameTooLarge {
                size,
                max: config.max_frame_size,
            };
            warn!(offset = pos, frame = %header.id, error = %err, "frame rejected");
            break Termination::Malformed {
                offset: pos,
                reason: err.to_string(),
            };
        }

        let body_start = pos + FRAME_HEADER_SIZE;
        let Some(body) = body_bytes(region, trailing, body_start, size) else {
            debug!(offset = pos, frame = %header.id, size, "partial frame body");
            break Termination::Truncated { offset: pos };
        };

        debug!(offset = pos, frame = %header.id, size, "decoding frame");
        frames.push(decode_nested(header, body, config, depth));
        pos = body_start + size;
    };

    (frames, termination)
}

fn overrun_shortfall(body: &Bytes, available_trailing: usize, offset: usize) -> Option<usize> {
    let raw = body.get(offset..)?.first_chunk::<FRAME_HEADER_SIZE>()?;
    let header = FrameHeader::parse(raw).ok()??;
    let end = offset + FRAME_HEADER_SIZE + header.size as usize;
    end.checked_sub(body.len() + available_trailing)
        .filter(|&missing| missing > 0)
}

fn body_bytes(region: &Bytes, trailing: &[u8], start: usize, size: usize) -> Option<Bytes> {
    let end = start + size;
    if end <= region.len() {
        return Some(region.slice(start..end));
    }

    let overrun = end - region.len();
    let extra = trailing.get(..overrun)?;
    let mut body = BytesMut::with_capacity(size);
    body.put_slice(&region[start..]);
    body.put_slice(extra);
    Some(body.freeze())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameBody;
    use crate::synchsafe::apply_unsynchronization;

    fn tag_bytes(flags: u8, size: u32, body: &[u8]) -> Vec<u8> {
        let mut out = b"ID3\x03\x00".to_vec();
        out.push(flags);
        out.extend_from_slice(&crate::synchsafe::encode(size).unwrap());
        out.extend_from_slice(body);
        out
    }

    fn frame_bytes(id: &[u8; 4], body: &[u8]) -> Vec<u8> {
        let mut out = id.to_vec();
        out.extend_from_slice(&crate::synchsafe::encode(body.len() as u32).unwrap());
        out.extend_from_slice(&[0, 0]);
        out.extend_from_slice(body);
        out
    }

    #[test]
    fn stops_at_padding() {
        let mut body = frame_bytes(b"TIT2", b"\x00Song\x00");
        body.extend_from_slice(&[0; 32]);
        let tag = Tag::parse(&tag_bytes(0, body.len() as u32, &body)).unwrap();

        assert_eq!(tag.len(), 1);
        assert_eq!(tag.termination(), &Termination::Padding { offset: 16 });
        assert_eq!(tag.frames()[0].id(), "TIT2");
    }

    #[test]
    fn exhausts_declared_size() {
        let mut body = frame_bytes(b"TALB", b"\x00Album");
        body.extend(frame_bytes(b"TPE1", b"\x00Artist"));
        let tag = Tag::parse(&tag_bytes(0, body.len() as u32, &body)).unwrap();

        assert_eq!(tag.len(), 2);
        assert_eq!(tag.get("TPE1").and_then(Frame::text), Some("Artist"));
        assert_eq!(tag.termination(), &Termination::Exhausted);
    }

    #[test]
    fn short_trailing_zeros_count_as_padding() {
        let mut body = frame_bytes(b"TALB", b"\x00Album");
        body.extend_from_slice(&[0; 4]);
        let tag = Tag::parse(&tag_bytes(0, body.len() as u32, &body)).unwrap();
        assert!(matches!(tag.termination(), Termination::Padding { .. }));
    }

    #[test]
    fn overrun_is_rejected_when_disabled() {
        let body = frame_bytes(b"TIT2", b"\x00Song\x00");
        let mut buf = tag_bytes(0, 15, &body);
        buf.extend_from_slice(&[0; 8]);

        let strict = TagConfig {
            allow_frame_overrun: false,
            ..TagConfig::default()
        };
        let tag = Tag::parse_with_config(&buf, &strict).unwrap();
        assert!(tag.is_empty());
        assert_eq!(tag.termination(), &Termination::Truncated { offset: 0 });

        let lenient = Tag::parse(&buf).unwrap();
        assert_eq!(lenient.len(), 1);
    }

    #[test]
    fn unsynchronized_overrun_is_restored() {
        let mut data = vec![0x11; 8];
        data.extend_from_slice(&[0xFF, 0xE0, 0xFF, 0x00, 0xFF]);
        let mut body = b"owner\x00".to_vec();
        body.extend_from_slice(&data);
        let stuffed = apply_unsynchronization(&frame_bytes(b"PRIV", &body));

        // Cut after a stuffing byte, then between an FF and its stuffing byte.
        for cut in [6, 7] {
            let declared = stuffed.len() - cut;
            let buf = tag_bytes(0x80, declared as u32, &stuffed);
            let tag = Tag::parse(&buf).unwrap();

            assert_eq!(tag.len(), 1, "cut {cut}");
            let FrameBody::Private(private) = &tag.frames()[0].body else {
                panic!("expected private frame for cut {cut}");
            };
            assert_eq!(private.data.as_ref(), data.as_slice(), "cut {cut}");
        }
    }

    #[test]
    fn overrun_shortfall_counts_missing_bytes() {
        let body = frame_bytes(b"TIT2", b"\x00A longer title");
        let mut buf = tag_bytes(0, 12, &body);
        buf.truncate(buf.len() - 5);

        let tag = Tag::parse(&buf).unwrap();
        assert!(tag.is_empty());
        assert_eq!(tag.termination(), &Termination::Truncated { offset: 0 });
        assert_eq!(tag.overrun_shortfall(), Some(5));

        let complete = Tag::parse(&tag_bytes(0, 12, &body)).unwrap();
        assert_eq!(complete.overrun_shortfall(), None);
    }

    #[test]
    fn oversized_frame_is_malformed() {
        let body = frame_bytes(b"TIT2", b"\x00Song\x00");
        let config = TagConfig {
            max_frame_size: 4,
            ..TagConfig::default()
        };
        let tag = Tag::parse_with_config(&tag_bytes(0, body.len() as u32, &body), &config).unwrap();
        assert!(matches!(
            tag.termination(),
            Termination::Malformed { offset: 0, .. }
        ));
    }

    #[test]
    fn invalid_frame_id_stops_iteration() {
        let mut body = frame_bytes(b"TIT2", b"\x00Song");
        body.extend(frame_bytes(b"ti!2", b"\x00junk"));
        let tag = Tag::parse(&tag_bytes(0, body.len() as u32, &body)).unwrap();
        assert_eq!(tag.len(), 1);
        assert!(matches!(
            tag.termination(),
            Termination::Malformed { offset: 15, .. }
        ));
    }

    #[test]
    fn skips_extended_header() {
        let mut body = vec![0, 0, 0, 6, 0, 0, 0, 0, 0, 0];
        body.extend(frame_bytes(b"TIT2", b"\x00Song"));
        let tag = Tag::parse(&tag_bytes(0x40, body.len() as u32, &body)).unwrap();

        assert_eq!(tag.extended_header().map(|e| e.size), Some(6));
        assert_eq!(tag.len(), 1);
    }

    #[test]
    fn truncated_extended_header_yields_empty_tag() {
        let body = [0, 0, 0, 10, 0x80];
        let tag = Tag::parse(&tag_bytes(0x40, body.len() as u32, &body)).unwrap();
        assert!(tag.is_empty());
        assert_eq!(tag.termination(), &Termination::Truncated { offset: 0 });
    }

    #[test]
    fn lookup_and_iteration() {
        let mut body = frame_bytes(b"COMM", b"\x00eng\x00first");
        body.extend(frame_bytes(b"TIT2", b"\x00Song"));
        body.extend(frame_bytes(b"COMM", b"\x00eng\x00second"));
        let tag = Tag::parse(&tag_bytes(0, body.len() as u32, &body)).unwrap();

        let comments: Vec<_> = tag.get_all("COMM").filter_map(Frame::text).collect();
        assert_eq!(comments, vec!["first", "second"]);
        assert!(matches!(tag.get("TIT2").map(|f| &f.body), Some(FrameBody::Text(_))));
        assert_eq!((&tag).into_iter().count(), 3);
        assert_eq!(tag.size(), 10 + body.len());
    }
}
