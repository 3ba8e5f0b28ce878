use crate::error::{Result as ServerErrorResult, ServerError};

use bc_config::LoggingConfig;

use std::fmt::{self, Display};
use std::path::PathBuf;
use std::time::SystemTime;

use fern::colors::{Color, ColoredLevelConfig};
use fern::{Dispatch, FormatCallback, Output};
use log::{Level, Record, info};

/// Where log lines go and whether their level is colored
pub(crate) enum Sink {
    File(PathBuf),
    Stdout { colored: bool },
}

impl Sink {
    /// A file wins over stdout; colors only apply to stdout
    pub(crate) fn select(config: &LoggingConfig, log_file: Option<PathBuf>) -> Self {
        match log_file {
            Some(path) => Sink::File(path),
            None => Sink::Stdout {
                colored: config.colored,
            },
        }
    }

    fn colors(&self) -> Option<ColoredLevelConfig> {
        match self {
            Sink::Stdout { colored: true } => Some(
                ColoredLevelConfig::new()
                    .trace(Color::Magenta)
                    .debug(Color::Blue)
                    .info(Color::Green)
                    .warn(Color::Yellow)
                    .error(Color::Red),
            ),
            _ => None,
        }
    }

    fn output(&self) -> ServerErrorResult<Output> {
        match self {
            Sink::File(path) => fern::log_file(path)
                .map(Output::from)
                .map_err(|source| ServerError::LogFile {
                    path: path.display().to_string(),
                    source,
                }),
            Sink::Stdout { .. } => Ok(Output::from(std::io::stdout())),
        }
    }
}

/// Initialize the global fern logger from the `[logging]` section.
///
/// Worker spans reach the same sink through the tracing `log` feature.
pub fn initialize(config: &LoggingConfig, log_file: Option<PathBuf>) -> ServerErrorResult<()> {
    let sink = Sink::select(config, log_file);
    let colors = sink.colors();

    let mut dispatch = Dispatch::new()
        .level(config.level.0)
        .format(move |out, message, record| format_line(out, message, record, colors));

    for (target, level) in config.target_levels() {
        dispatch = dispatch.level_for(target, level);
    }

    dispatch
        .chain(sink.output()?)
        .apply()
        .map_err(|e| ServerError::Logger {
            message: format!("Failed to initialize logger: {e}"),
        })?;

    match &sink {
        Sink::File(path) => info!(
            "Logger initialized: level={}, file={}",
            *config.level,
            path.display()
        ),
        Sink::Stdout { colored } => info!(
            "Logger initialized: level={}, stdout (colored: {})",
            *config.level, colored
        ),
    }

    // Bridge tracing to log
    tracing_log::LogTracer::init().ok();

    Ok(())
}

/// `[rfc3339 - LEVEL] target: message [file:line]`
fn format_line(
    out: FormatCallback,
    message: &fmt::Arguments,
    record: &Record,
    colors: Option<ColoredLevelConfig>,
) {
    out.finish(format_args!(
        "[{} - {}] {}: {} [{}:{}]",
        humantime::format_rfc3339(SystemTime::now()),
        LevelLabel {
            level: record.level(),
            colors,
        },
        short_target(record.target()),
        message,
        record.file().unwrap_or("unknown"),
        record.line().unwrap_or(0),
    ));
}

struct LevelLabel {
    level: Level,
    colors: Option<ColoredLevelConfig>,
}

impl Display for LevelLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.colors {
            Some(colors) => write!(f, "{}", colors.color(self.level)),
            None => write!(f, "{}", self.level),
        }
    }
}

/// Drop module paths below the crate: `bc_dispatch::jobs::job_runner` -> `bc_dispatch`
pub(crate) fn short_target(target: &str) -> &str {
    target.split("::").next().unwrap_or(target)
}
