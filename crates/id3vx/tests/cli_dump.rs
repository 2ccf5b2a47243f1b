#![cfg(all(unix, feature = "cli"))]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = PathBuf::from(format!(
        "/tmp/id3vx-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn frame(id: &[u8; 4], body: &[u8]) -> Vec<u8> {
    let mut out = id.to_vec();
    out.extend_from_slice(&(body.len() as u32).to_be_bytes());
    out.extend_from_slice(&[0, 0]);
    out.extend_from_slice(body);
    out
}

const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

/// Tag with a title, an undecodable comment, a cover and padding, then audio.
fn fixture_mp3(dir: &Path) -> PathBuf {
    let mut body = frame(b"TIT2", b"\x00Song");
    body.extend(frame(b"COMM", b"\x00e"));
    let mut apic = b"\x00image/jpeg\x00\x03cover\x00".to_vec();
    apic.extend_from_slice(JPEG);
    body.extend(frame(b"APIC", &apic));
    body.extend_from_slice(&[0; 32]);

    let mut file = b"ID3\x03\x00\x00".to_vec();
    let size = body.len() as u32;
    file.extend_from_slice(&[
        ((size >> 21) & 0x7F) as u8,
        ((size >> 14) & 0x7F) as u8,
        ((size >> 7) & 0x7F) as u8,
        (size & 0x7F) as u8,
    ]);
    file.extend(body);
    file.extend_from_slice(&[0xFF, 0xFB, 0x90, 0x64, 0x00, 0x00]);

    let path = dir.join("song.mp3");
    std::fs::write(&path, file).expect("fixture should be writable");
    path
}

fn id3vx(args: &[&str], path: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_id3vx"))
        .arg("--log-level")
        .arg("error")
        .args(args)
        .arg(path)
        .output()
        .expect("id3vx should run")
}

#[test]
fn dump_json_lists_frames_and_termination() {
    let dir = unique_temp_dir("dump");
    let path = fixture_mp3(&dir);

    let output = id3vx(&["--format", "json", "dump"], &path);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let doc: serde_json::Value = serde_json::from_str(stdout.trim()).expect("stdout should be JSON");
    assert!(doc["schema_id"]
        .as_str()
        .is_some_and(|id| id.ends_with("tag-dump.schema.json")));
    assert_eq!(doc["header"]["version"], "2.3.0");

    let frames = doc["frames"].as_array().expect("frames array");
    assert_eq!(frames.len(), 3);
    assert_eq!(frames[0]["id"], "TIT2");
    assert_eq!(frames[0]["value"], "Song");
    assert_eq!(frames[0]["decoded"], true);
    assert_eq!(frames[1]["id"], "COMM");
    assert_eq!(frames[1]["decoded"], false);
    assert!(frames[1]["reason"]
        .as_str()
        .is_some_and(|r| r.starts_with("malformed frame")));
    assert_eq!(frames[2]["kind"], "picture");
    assert_eq!(doc["termination"]["state"], "padding");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn header_json_reports_sizes() {
    let dir = unique_temp_dir("header");
    let path = fixture_mp3(&dir);

    let output = id3vx(&["--format", "json", "header"], &path);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("tag-header.schema.json"));
    assert!(stdout.contains("\"flags\":[]"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn picture_is_written_to_output_file() {
    let dir = unique_temp_dir("picture");
    let path = fixture_mp3(&dir);
    let cover = dir.join("cover.jpg");

    let output = Command::new(env!("CARGO_BIN_EXE_id3vx"))
        .arg("--log-level")
        .arg("error")
        .arg("picture")
        .arg(&path)
        .arg("--output")
        .arg(&cover)
        .output()
        .expect("id3vx should run");
    assert!(output.status.success());
    assert_eq!(std::fs::read(&cover).expect("cover written"), JPEG);

    let missing = id3vx(&["picture", "--index", "3"], &path);
    assert_eq!(missing.status.code(), Some(64));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn non_id3_file_returns_60() {
    let dir = unique_temp_dir("notid3");
    let path = dir.join("audio.wav");
    std::fs::write(&path, b"RIFF\x24\x00\x00\x00WAVEfmt ").expect("fixture should be writable");

    let output = id3vx(&["dump"], &path);
    assert_eq!(output.status.code(), Some(60));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not an ID3 tag"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_file_returns_1() {
    let dir = unique_temp_dir("missing");
    let output = id3vx(&["dump"], &dir.join("absent.mp3"));
    assert_eq!(output.status.code(), Some(1));

    let _ = std::fs::remove_dir_all(&dir);
}
