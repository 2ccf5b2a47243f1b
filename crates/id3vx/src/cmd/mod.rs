use clap::{Args, Subcommand};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use id3vx_tag::{Tag, TagReader};

use crate::exit::{io_error, tag_error, CliResult};
use crate::output::OutputFormat;

pub mod dump;
pub mod header;
pub mod picture;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the tag header and every frame.
    Dump(DumpArgs),
    /// Print the tag header only.
    Header(HeaderArgs),
    /// Extract an attached picture.
    Picture(PictureArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Dump(args) => dump::run(args, format),
        Command::Header(args) => header::run(args, format),
        Command::Picture(args) => picture::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct DumpArgs {
    /// MP3 file to read.
    pub path: PathBuf,
}

#[derive(Args, Debug)]
pub struct HeaderArgs {
    /// MP3 file to read.
    pub path: PathBuf,
}

#[derive(Args, Debug)]
pub struct PictureArgs {
    /// MP3 file to read.
    pub path: PathBuf,
    /// Which APIC frame to extract, in file order.
    #[arg(long, default_value = "0")]
    pub index: usize,
    /// Write the image here instead of stdout.
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Open `path` and decode the tag at its start.
pub(crate) fn read_tag(path: &Path) -> CliResult<Tag> {
    let context = path.display().to_string();
    let file = File::open(path).map_err(|err| io_error(&context, err))?;
    let tag = TagReader::new(BufReader::new(file))
        .read_tag()
        .map_err(|err| tag_error(&context, err))?;
    tracing::debug!(path = %context, frames = tag.len(), "tag read");
    Ok(tag)
}
