use crate::cmd::{read_tag, DumpArgs};
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_tag, OutputFormat};

pub fn run(args: DumpArgs, format: OutputFormat) -> CliResult<i32> {
    let tag = read_tag(&args.path)?;
    print_tag(&tag, &args.path.display().to_string(), format);
    Ok(SUCCESS)
}
