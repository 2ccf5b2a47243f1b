use crate::cmd::{read_tag, HeaderArgs};
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_header, OutputFormat};

pub fn run(args: HeaderArgs, format: OutputFormat) -> CliResult<i32> {
    let tag = read_tag(&args.path)?;
    print_header(
        tag.header(),
        tag.extended_header(),
        &args.path.display().to_string(),
        format,
    );
    Ok(SUCCESS)
}
