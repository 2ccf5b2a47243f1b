use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("id3vx {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: id3vx");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "target: {}",
        option_env!("ID3VX_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!(
        "profile: {}",
        option_env!("ID3VX_BUILD_PROFILE").unwrap_or("unknown")
    );
    println!(
        "rustc: {}",
        option_env!("ID3VX_RUSTC_VERSION").unwrap_or("unknown")
    );
    println!("supported_tags: ID3v2.3");
    println!("max_frame_size: {}", id3vx_tag::DEFAULT_MAX_FRAME_SIZE);
    println!(
        "max_chapter_depth: {}",
        id3vx_tag::DEFAULT_MAX_CHAPTER_DEPTH
    );
    println!(
        "log_filter_env: {}",
        crate::logging::LOG_FILTER_ENV
    );

    Ok(SUCCESS)
}
