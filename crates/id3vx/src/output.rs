use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use id3vx_tag::{ExtendedHeader, Frame, FrameBody, Tag, TagHeader, Termination};
use serde::Serialize;

const DUMP_SCHEMA_ID: &str = "https://schemas.id3vx.dev/cli/v1/tag-dump.schema.json";
const HEADER_SCHEMA_ID: &str = "https://schemas.id3vx.dev/cli/v1/tag-header.schema.json";

/// Longest value shown in a table cell or pretty line.
const PREVIEW_CHARS: usize = 64;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
pub struct HeaderOutput {
    pub version: String,
    pub flags: Vec<String>,
    pub size: u32,
    pub tag_size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extended_header: Option<ExtendedHeaderOutput>,
}

#[derive(Serialize)]
pub struct ExtendedHeaderOutput {
    pub size: u32,
    pub padding_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crc: Option<u32>,
}

#[derive(Serialize)]
pub struct FrameOutput {
    pub id: String,
    pub name: String,
    pub size: u32,
    pub flags: Vec<String>,
    pub decoded: bool,
    pub kind: &'static str,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sub_frames: Vec<FrameOutput>,
}

#[derive(Serialize)]
pub struct TerminationOutput {
    pub state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Serialize)]
struct HeaderDocument<'a> {
    schema_id: &'a str,
    path: &'a str,
    header: HeaderOutput,
}

#[derive(Serialize)]
struct DumpDocument<'a> {
    schema_id: &'a str,
    path: &'a str,
    header: HeaderOutput,
    frames: Vec<FrameOutput>,
    termination: TerminationOutput,
}

impl HeaderOutput {
    pub fn new(header: &TagHeader, extended: Option<&ExtendedHeader>) -> Self {
        Self {
            version: format!("2.{}.{}", header.major, header.minor),
            flags: flag_names(header.flags.iter_names().map(|(name, _)| name)),
            size: header.size,
            tag_size: header.tag_size(),
            extended_header: extended.map(|ext| ExtendedHeaderOutput {
                size: ext.size,
                padding_size: ext.padding_size,
                crc: ext.crc,
            }),
        }
    }
}

impl FrameOutput {
    pub fn new(frame: &Frame) -> Self {
        let reason = match &frame.body {
            FrameBody::Unknown(unknown) => Some(unknown.reason.to_string()),
            _ => None,
        };
        let sub_frames = match &frame.body {
            FrameBody::Chapter(chapter) => chapter.sub_frames.iter().map(Self::new).collect(),
            _ => Vec::new(),
        };
        Self {
            id: frame.id().to_string(),
            name: frame.name().to_string(),
            size: frame.header.size,
            flags: flag_names(frame.header.flags.iter_names().map(|(name, _)| name)),
            decoded: frame.is_decoded(),
            kind: body_kind(&frame.body),
            value: body_value(&frame.body),
            reason,
            sub_frames,
        }
    }
}

impl TerminationOutput {
    pub fn new(termination: &Termination) -> Self {
        match termination {
            Termination::Exhausted => Self {
                state: "exhausted",
                offset: None,
                reason: None,
            },
            Termination::Padding { offset } => Self {
                state: "padding",
                offset: Some(*offset),
                reason: None,
            },
            Termination::Truncated { offset } => Self {
                state: "truncated",
                offset: Some(*offset),
                reason: None,
            },
            Termination::Malformed { offset, reason } => Self {
                state: "malformed",
                offset: Some(*offset),
                reason: Some(reason.clone()),
            },
        }
    }
}

pub fn print_tag(tag: &Tag, path: &str, format: OutputFormat) {
    let header = HeaderOutput::new(tag.header(), tag.extended_header());
    let frames: Vec<FrameOutput> = tag.iter().map(FrameOutput::new).collect();
    let termination = TerminationOutput::new(tag.termination());

    match format {
        OutputFormat::Json => {
            let out = DumpDocument {
                schema_id: DUMP_SCHEMA_ID,
                path,
                header,
                frames,
                termination,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            println!("{}", header_table(&header));
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["ID", "NAME", "SIZE", "STATUS", "VALUE"]);
            for frame in flatten(&frames) {
                table.add_row(vec![
                    frame.id.clone(),
                    frame.name.clone(),
                    frame.size.to_string(),
                    status(frame),
                    preview(&frame.value),
                ]);
            }
            println!("{table}");
            println!("{}", termination_line(&termination));
        }
        OutputFormat::Pretty => {
            println!("{}", header_line(&header));
            for frame in &frames {
                print_pretty_frame(frame, 1);
            }
            println!("{}", termination_line(&termination));
        }
        OutputFormat::Raw => {
            for frame in flatten(&frames) {
                println!("{}\t{}", frame.id, frame.value);
            }
        }
    }
}

pub fn print_header(
    header: &TagHeader,
    extended: Option<&ExtendedHeader>,
    path: &str,
    format: OutputFormat,
) {
    let header = HeaderOutput::new(header, extended);
    match format {
        OutputFormat::Json => {
            let out = HeaderDocument {
                schema_id: HEADER_SCHEMA_ID,
                path,
                header,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => println!("{}", header_table(&header)),
        OutputFormat::Pretty | OutputFormat::Raw => println!("{}", header_line(&header)),
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn header_table(header: &HeaderOutput) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["VERSION", "FLAGS", "SIZE", "TAG SIZE"])
        .add_row(vec![
            header.version.clone(),
            joined_flags(&header.flags),
            header.size.to_string(),
            header.tag_size.to_string(),
        ]);
    table
}

fn header_line(header: &HeaderOutput) -> String {
    format!(
        "Tag(version={}, flags={}, size={})",
        header.version,
        joined_flags(&header.flags),
        header.tag_size
    )
}

fn termination_line(termination: &TerminationOutput) -> String {
    let mut line = format!("end: {}", termination.state);
    if let Some(offset) = termination.offset {
        line.push_str(&format!(" at offset {offset}"));
    }
    if let Some(reason) = &termination.reason {
        line.push_str(&format!(" ({reason})"));
    }
    line
}

fn print_pretty_frame(frame: &FrameOutput, depth: usize) {
    println!(
        "{}{} [{}] size={} {}: {}",
        "  ".repeat(depth),
        frame.id,
        frame.name,
        frame.size,
        status(frame),
        preview(&frame.value)
    );
    for sub in &frame.sub_frames {
        print_pretty_frame(sub, depth + 1);
    }
}

/// Frames in display order with chapter sub-frames following their chapter.
fn flatten(frames: &[FrameOutput]) -> Vec<&FrameOutput> {
    let mut out = Vec::new();
    for frame in frames {
        out.push(frame);
        out.extend(flatten(&frame.sub_frames));
    }
    out
}

fn status(frame: &FrameOutput) -> String {
    match &frame.reason {
        None => "decoded".to_string(),
        Some(reason) => format!("raw ({reason})"),
    }
}

fn joined_flags(flags: &[String]) -> String {
    if flags.is_empty() {
        "-".to_string()
    } else {
        flags.join(",")
    }
}

fn flag_names<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    names
        .map(|name| name.to_ascii_lowercase().replace('_', "-"))
        .collect()
}

fn preview(value: &str) -> String {
    if value.chars().count() <= PREVIEW_CHARS {
        return value.to_string();
    }
    let cut: String = value.chars().take(PREVIEW_CHARS).collect();
    format!("{cut}...")
}

fn body_kind(body: &FrameBody) -> &'static str {
    match body {
        FrameBody::Text(_) => "text",
        FrameBody::UserText(_) => "user-text",
        FrameBody::Url(_) => "url",
        FrameBody::UserUrl(_) => "user-url",
        FrameBody::Comment(_) => "comment",
        FrameBody::Lyrics(_) => "lyrics",
        FrameBody::Picture(_) => "picture",
        FrameBody::Object(_) => "object",
        FrameBody::TermsOfUse(_) => "terms-of-use",
        FrameBody::Private(_) => "private",
        FrameBody::PlayCounter(_) => "play-counter",
        FrameBody::Chapter(_) => "chapter",
        FrameBody::Unknown(_) => "unknown",
    }
}

fn body_value(body: &FrameBody) -> String {
    match body {
        FrameBody::Text(text) => text.text.clone(),
        FrameBody::UserText(text) => format!("{}={}", text.description, text.value),
        FrameBody::Url(url) => url.url.clone(),
        FrameBody::UserUrl(url) => format!("{}={}", url.description, url.url),
        FrameBody::Comment(comment) | FrameBody::Lyrics(comment) => format!(
            "[{}] {}: {}",
            comment.language_code(),
            comment.description,
            comment.text
        ),
        FrameBody::Picture(picture) => format!(
            "{}, {}, {} bytes",
            picture.mime_type,
            picture.kind().description(),
            picture.data.len()
        ),
        FrameBody::Object(object) => format!(
            "{}, {}, {} bytes",
            object.mime_type,
            object.filename,
            object.data.len()
        ),
        FrameBody::TermsOfUse(terms) => format!("[{}] {}", terms.language_code(), terms.text),
        FrameBody::Private(private) => {
            format!("{}, {} bytes", private.owner, private.data.len())
        }
        FrameBody::PlayCounter(counter) => counter.count.to_string(),
        FrameBody::Chapter(chapter) => format!(
            "{} {}-{} ms",
            chapter.element_id, chapter.start_ms, chapter.end_ms
        ),
        FrameBody::Unknown(unknown) => format!("<binary {} bytes>", unknown.data.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dump(buf: &[u8]) -> Tag {
        Tag::parse(buf).unwrap()
    }

    #[test]
    fn frame_output_marks_raw_frames() {
        let mut buf = b"ID3\x03\x00\x00\x00\x00\x00\x1A".to_vec();
        buf.extend_from_slice(b"TIT2\x00\x00\x00\x05\x00\x00\x00Song");
        buf.extend_from_slice(b"ZZZZ\x00\x00\x00\x01\x00\x00\x07");

        let tag = dump(&buf);
        let title = FrameOutput::new(&tag.frames()[0]);
        assert!(title.decoded);
        assert_eq!(title.kind, "text");
        assert_eq!(title.value, "Song");
        assert!(title.reason.is_none());

        let unknown = FrameOutput::new(&tag.frames()[1]);
        assert!(!unknown.decoded);
        assert_eq!(unknown.reason.as_deref(), Some("unsupported frame"));
        assert_eq!(unknown.value, "<binary 1 bytes>");
    }

    #[test]
    fn object_frame_summary() {
        let mut buf = b"ID3\x03\x00\x00\x00\x00\x00\x20".to_vec();
        buf.extend_from_slice(b"GEOB\x00\x00\x00\x16\x00\x00");
        buf.extend_from_slice(b"\x00text/plain\x00a.txt\x00\x00hi!");

        let tag = dump(&buf);
        let object = FrameOutput::new(&tag.frames()[0]);
        assert!(object.decoded);
        assert_eq!(object.kind, "object");
        assert_eq!(object.value, "text/plain, a.txt, 3 bytes");
    }

    #[test]
    fn header_output_lists_flags() {
        let header = TagHeader::parse(b"ID3\x03\x00\xA0\x00\x00\x01\x00").unwrap();
        let out = HeaderOutput::new(&header, None);
        assert_eq!(out.version, "2.3.0");
        assert_eq!(out.flags, vec!["unsynchronization", "experimental"]);
        assert_eq!(out.size, 128);
        assert_eq!(out.tag_size, 138);
    }

    #[test]
    fn termination_output_carries_offset() {
        let out = TerminationOutput::new(&Termination::Malformed {
            offset: 42,
            reason: "invalid frame id".to_string(),
        });
        assert_eq!(out.state, "malformed");
        assert_eq!(
            termination_line(&out),
            "end: malformed at offset 42 (invalid frame id)"
        );
    }

    #[test]
    fn long_values_are_shortened() {
        let value = "x".repeat(PREVIEW_CHARS + 10);
        let shown = preview(&value);
        assert_eq!(shown.chars().count(), PREVIEW_CHARS + 3);
        assert!(shown.ends_with("..."));
    }
}
