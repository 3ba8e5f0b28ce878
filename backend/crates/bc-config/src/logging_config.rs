use crate::{DEFAULT_LOG_DIRECTORY, DEFAULT_LOG_LEVEL, LogLevel};

use std::collections::BTreeMap;

use serde::Deserialize;

/// Targets quieter than the global level unless overridden
const DEFAULT_TARGET_LEVELS: &[(&str, log::LevelFilter)] = &[
    // sqlx logs every statement at info
    ("sqlx", log::LevelFilter::Warn),
    ("hyper", log::LevelFilter::Warn),
];

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    /// Directory for `file`, relative to the config dir
    pub dir: String,
    /// Log to this file instead of stdout
    pub file: Option<String>,
    pub colored: bool,
    /// Per-target levels, e.g. `bc_dispatch = "debug"`
    pub targets: BTreeMap<String, LogLevel>,
}

impl LoggingConfig {
    /// Built-in target levels merged with `targets`; configured entries win
    pub fn target_levels(&self) -> Vec<(String, log::LevelFilter)> {
        let mut levels: BTreeMap<String, log::LevelFilter> = DEFAULT_TARGET_LEVELS
            .iter()
            .map(|(target, level)| (target.to_string(), *level))
            .collect();
        levels.extend(self.targets.iter().map(|(t, l)| (t.clone(), l.0)));
        levels.into_iter().collect()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel(DEFAULT_LOG_LEVEL),
            dir: String::from(DEFAULT_LOG_DIRECTORY),
            file: None,
            colored: true,
            targets: BTreeMap::new(),
        }
    }
}
