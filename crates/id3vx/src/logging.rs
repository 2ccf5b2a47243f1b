use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

/// Full filter directives, overriding `--log-level` when set.
pub const LOG_FILTER_ENV: &str = "ID3VX_LOG";

/// Crates whose events `--log-level` controls. Other targets stay silent.
const LOG_TARGETS: [&str; 2] = ["id3vx", "id3vx_tag"];

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn directive(self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// Module paths are only worth printing once per-frame events show up.
    fn shows_targets(self) -> bool {
        matches!(self, LogLevel::Debug | LogLevel::Trace)
    }
}

/// Filter passing decoder and CLI events at `level` and above.
///
/// Recovered frames are logged by the decoder at `warn`, so `error` or `off`
/// hides them.
pub fn filter_for(level: LogLevel) -> EnvFilter {
    let directives = LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={}", level.directive()));
    let joined = std::iter::once("off".to_string())
        .chain(directives)
        .collect::<Vec<_>>()
        .join(",");
    EnvFilter::new(joined)
}

pub fn init_logging(format: LogFormat, level: LogLevel) {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| filter_for(level));
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(level.shows_targets());

    match format {
        LogFormat::Text => {
            let _ = builder.try_init();
        }
        LogFormat::Json => {
            let _ = builder.json().try_init();
        }
    }
}
