use id3vx_tag::FrameBody;
use tracing::info;

use crate::cmd::{read_tag, PictureArgs};
use crate::exit::{io_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_raw, OutputFormat};

pub fn run(args: PictureArgs, _format: OutputFormat) -> CliResult<i32> {
    let tag = read_tag(&args.path)?;
    let pictures: Vec<_> = tag
        .get_all("APIC")
        .filter_map(|frame| match &frame.body {
            FrameBody::Picture(picture) => Some(picture),
            _ => None,
        })
        .collect();

    let picture = pictures.get(args.index).ok_or_else(|| {
        CliError::new(
            USAGE,
            format!(
                "{}: no picture at index {} ({} decoded)",
                args.path.display(),
                args.index,
                pictures.len()
            ),
        )
    })?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &picture.data)
                .map_err(|err| io_error(&path.display().to_string(), err))?;
            info!(
                output = %path.display(),
                mime = %picture.mime_type,
                size = picture.data.len(),
                "picture written"
            );
        }
        None => print_raw(&picture.data),
    }
    Ok(SUCCESS)
}
