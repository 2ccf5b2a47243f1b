//! Frame body layouts, one decoder per frame id family.

use bytes::Bytes;
use tracing::{debug, warn};

use crate::config::TagConfig;
use crate::error::{Result, TagError};
use crate::frame::{
    ChapterFrame, CommentFrame, Frame, FrameBody, FrameHeader, FrameId, ObjectFrame, PictureFrame,
    PlayCounterFrame, PrivateFrame, RawReason, TermsOfUseFrame, TextFrame, UnknownFrame, UrlFrame,
    UserTextFrame, UserUrlFrame,
};
use crate::synchsafe;
use crate::tag::walk_frames;
use crate::text::TextEncoding;

/// Decode a frame body according to its id.
///
/// Never fails: bodies that cannot be decoded are kept as
/// [`FrameBody::Unknown`] with the raw bytes and the reason.
pub fn decode_frame(header: FrameHeader, data: Bytes, config: &TagConfig) -> Frame {
    decode_nested(header, data, config, 0)
}

/// Decode a frame found inside `depth` enclosing `CHAP` frames.
pub(crate) fn decode_nested(
    header: FrameHeader,
    data: Bytes,
    config: &TagConfig,
    depth: usize,
) -> Frame {
    if header.compressed() || header.encrypted() {
        let reason = if header.encrypted() {
            RawReason::Encrypted
        } else {
            RawReason::Compressed
        };
        debug!(frame = %header.id, %reason, "frame kept raw");
        return Frame {
            header,
            group_id: None,
            body: FrameBody::Unknown(UnknownFrame { data, reason }),
        };
    }

    let (group_id, data) = match (header.grouped(), data.first()) {
        (true, Some(&group)) => (Some(group), data.slice(1..)),
        _ => (None, data),
    };

    let body = match decode_body(header.id, &data, config, depth) {
        Ok(body) => body,
        Err(err) => {
            warn!(frame = %header.id, error = %err, "frame retained undecoded");
            FrameBody::Unknown(UnknownFrame {
                data,
                reason: RawReason::Malformed(err.to_string()),
            })
        }
    };

    Frame {
        header,
        group_id,
        body,
    }
}

fn decode_body(id: FrameId, data: &Bytes, config: &TagConfig, depth: usize) -> Result<FrameBody> {
    match id.as_bytes() {
        b"TXXX" => user_text(data).map(FrameBody::UserText),
        &[b'T', ..] | b"XSOA" | b"XSOP" | b"XSOT" => text(data).map(FrameBody::Text),
        b"WXXX" => user_url(data).map(FrameBody::UserUrl),
        &[b'W', ..] => url(data).map(FrameBody::Url),
        b"COMM" => comment(data).map(FrameBody::Comment),
        b"USLT" => comment(data).map(FrameBody::Lyrics),
        b"APIC" => picture(data).map(FrameBody::Picture),
        b"GEOB" => object(data).map(FrameBody::Object),
        b"USER" => terms_of_use(data).map(FrameBody::TermsOfUse),
        b"PRIV" | b"UFID" => private(data).map(FrameBody::Private),
        b"PCNT" => play_counter(data).map(FrameBody::PlayCounter),
        b"CHAP" => chapter(data, config, depth).map(FrameBody::Chapter),
        _ => Ok(FrameBody::Unknown(UnknownFrame {
            data: data.clone(),
            reason: RawReason::Unsupported,
        })),
    }
}

/// Text encoding   $xx
/// Information     <text string according to encoding>
fn text(data: &[u8]) -> Result<TextFrame> {
    let (encoding, rest) = read_encoding(data)?;
    Ok(TextFrame {
        encoding,
        text: encoding.decode(rest)?,
    })
}

/// Text encoding   $xx
/// Description     <text string according to encoding> $00 (00)
/// Value           <text string according to encoding>
fn user_text(data: &[u8]) -> Result<UserTextFrame> {
    let (encoding, rest) = read_encoding(data)?;
    let (description, rest) = encoding.split_field(rest, "TXXX description")?;
    Ok(UserTextFrame {
        encoding,
        description,
        value: encoding.decode(rest)?,
    })
}

fn url(data: &[u8]) -> Result<UrlFrame> {
    Ok(UrlFrame {
        url: TextEncoding::Latin1.decode(data)?,
    })
}

/// Text encoding   $xx
/// Description     <text string according to encoding> $00 (00)
/// URL             <text string>
fn user_url(data: &[u8]) -> Result<UserUrlFrame> {
    let (encoding, rest) = read_encoding(data)?;
    let (description, rest) = encoding.split_field(rest, "WXXX description")?;
    Ok(UserUrlFrame {
        encoding,
        description,
        url: TextEncoding::Latin1.decode(rest)?,
    })
}

/// Text encoding           $xx
/// Language                $xx xx xx
/// Short content descrip.  <text string according to encoding> $00 (00)
/// The actual text         <full text string according to encoding>
fn comment(data: &[u8]) -> Result<CommentFrame> {
    let (encoding, rest) = read_encoding(data)?;
    let (language, rest) = take(rest, 3, "language code")?;
    let (description, rest) = encoding.split_field(rest, "content descriptor")?;
    Ok(CommentFrame {
        encoding,
        language: [language[0], language[1], language[2]],
        description,
        text: encoding.decode(rest)?,
    })
}

/// Text encoding   $xx
/// MIME type       <text string> $00
/// Picture type    $xx
/// Description     <text string according to encoding> $00 (00)
/// Picture data    <binary data>
fn picture(data: &Bytes) -> Result<PictureFrame> {
    let (encoding, rest) = read_encoding(data)?;
    let (mime_type, rest) = TextEncoding::Latin1.split_field(rest, "MIME type")?;
    let (picture_type, rest) = take(rest, 1, "picture type")?;
    let (description, rest) = encoding.split_field(rest, "picture description")?;
    Ok(PictureFrame {
        encoding,
        mime_type,
        picture_type: picture_type[0],
        description,
        data: tail(data, rest),
    })
}

/// Text encoding           $xx
/// MIME type               <text string> $00
/// Filename                <text string according to encoding> $00 (00)
/// Content description     <text string according to encoding> $00 (00)
/// Encapsulated object     <binary data>
fn object(data: &Bytes) -> Result<ObjectFrame> {
    let (encoding, rest) = read_encoding(data)?;
    let (mime_type, rest) = TextEncoding::Latin1.split_field(rest, "MIME type")?;
    let (filename, rest) = encoding.split_field(rest, "object filename")?;
    let (description, rest) = encoding.split_field(rest, "object description")?;
    Ok(ObjectFrame {
        encoding,
        mime_type,
        filename,
        description,
        data: tail(data, rest),
    })
}

/// Text encoding   $xx
/// Language        $xx xx xx
/// The actual text <text string according to encoding>
fn terms_of_use(data: &[u8]) -> Result<TermsOfUseFrame> {
    let (encoding, rest) = read_encoding(data)?;
    let (language, rest) = take(rest, 3, "language code")?;
    Ok(TermsOfUseFrame {
        encoding,
        language: [language[0], language[1], language[2]],
        text: encoding.decode(rest)?,
    })
}

/// Owner identifier    <text string> $00
/// The private data    <binary data>
fn private(data: &Bytes) -> Result<PrivateFrame> {
    let (owner, rest) = TextEncoding::Latin1.split_field(data, "owner identifier")?;
    Ok(PrivateFrame {
        owner,
        data: tail(data, rest),
    })
}

/// Counter         $xx xx xx xx (xx ...)
fn play_counter(data: &[u8]) -> Result<PlayCounterFrame> {
    if data.len() < 4 {
        return Err(TagError::truncated("play counter", 4, data.len()));
    }
    let count = data.iter().fold(0u64, |acc, &b| {
        acc.saturating_mul(256).saturating_add(u64::from(b))
    });
    Ok(PlayCounterFrame { count })
}

/// Element ID      <text string> $00
/// Start time      $xx xx xx xx
/// End time        $xx xx xx xx
/// Start offset    $xx xx xx xx
/// End offset      $xx xx xx xx
/// <Optional embedded sub-frames>
fn chapter(data: &Bytes, config: &TagConfig, depth: usize) -> Result<ChapterFrame> {
    if depth > config.max_chapter_depth {
        return Err(TagError::ChapterTooDeep {
            depth,
            max: config.max_chapter_depth,
        });
    }
    let (element_id, rest) = TextEncoding::Latin1.split_field(data, "chapter element id")?;
    let (timings, rest) = take(rest, 16, "chapter timings")?;
    let word = |i: usize| {
        synchsafe::decode_u32_be([
            timings[i * 4],
            timings[i * 4 + 1],
            timings[i * 4 + 2],
            timings[i * 4 + 3],
        ])
    };

    let sub_frames = if config.decode_chapter_sub_frames {
        let (frames, _) = walk_frames(&tail(data, rest), 0, &[], config, depth + 1);
        frames
    } else {
        Vec::new()
    };

    Ok(ChapterFrame {
        element_id,
        start_ms: word(0),
        end_ms: word(1),
        start_offset: word(2),
        end_offset: word(3),
        sub_frames,
    })
}

fn read_encoding(data: &[u8]) -> Result<(TextEncoding, &[u8])> {
    let (marker, rest) = take(data, 1, "text encoding marker")?;
    Ok((TextEncoding::resolve(marker[0])?, rest))
}

fn take<'a>(data: &'a [u8], len: usize, field: &'static str) -> Result<(&'a [u8], &'a [u8])> {
    if data.len() < len {
        return Err(TagError::truncated(field, len, data.len()));
    }
    Ok(data.split_at(len))
}

/// Zero-copy slice of `data` holding the bytes of `rest`, a suffix of it.
fn tail(data: &Bytes, rest: &[u8]) -> Bytes {
    data.slice(data.len() - rest.len()..)
}
