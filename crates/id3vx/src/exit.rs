use std::fmt;
use std::io;

use id3vx_tag::{ErrorKind, TagError};

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound | io::ErrorKind::IsADirectory => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn tag_error(context: &str, err: TagError) -> CliError {
    match err {
        TagError::Io(source) => io_error(context, source),
        other => match other.kind() {
            ErrorKind::Format | ErrorKind::Truncation | ErrorKind::Range => {
                CliError::new(DATA_INVALID, format!("{context}: {other}"))
            }
            ErrorKind::Io => CliError::new(INTERNAL, format!("{context}: {other}")),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_id3_is_data_invalid() {
        let err = tag_error("song.mp3", TagError::NotId3);
        assert_eq!(err.code, DATA_INVALID);
        assert_eq!(err.to_string(), "song.mp3: not an ID3 tag");
    }

    #[test]
    fn io_errors_keep_their_class() {
        let denied = tag_error("x", TagError::Io(io::Error::from(io::ErrorKind::PermissionDenied)));
        assert_eq!(denied.code, PERMISSION_DENIED);

        let missing = io_error("x", io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(missing.code, FAILURE);
    }
}
