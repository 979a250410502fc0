//! Process-wide logger behind the `log` facade
//!
//! Call [`init_logging`] once at startup; everything else logs through the
//! usual `log::info!`/`log::warn!` macros.
//!
//! ```rust,no_run
//! use medgate_core::config::LoggingConfig;
//!
//! medgate_core::logging::init_logging(&LoggingConfig::default())?;
//! log::info!("Permission server starting");
//! # Ok::<(), anyhow::Error>(())
//! ```

mod format;

pub use format::{LogEntry, LogFormat, LogLevel, UnknownSetting};

use crate::config::LoggingConfig;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::str::FromStr;
use std::sync::Once;

static INIT: Once = Once::new();

/// Where formatted lines are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stdout,
    Stderr,
}

impl FromStr for LogTarget {
    type Err = UnknownSetting;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stdout" => Ok(LogTarget::Stdout),
            "stderr" => Ok(LogTarget::Stderr),
            _ => Err(UnknownSetting { kind: "log target", value: s.to_string() }),
        }
    }
}

/// Install the medgate logger. Later calls are no-ops.
///
/// Settings are validated before anything is installed, so a bad config
/// is reported even if the logger is already set.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let logger = MedgateLogger {
        level: config.level()?,
        format: config.format()?,
        target: config.target()?,
        fields: config.context_fields.clone(),
    };

    let mut result = Ok(());
    INIT.call_once(|| {
        let max_level = logger.level.filter();
        result = log::set_boxed_logger(Box::new(logger))
            .map(|()| log::set_max_level(max_level))
            .map_err(anyhow::Error::from);
    });
    result
}

struct MedgateLogger {
    level: LogLevel,
    format: LogFormat,
    target: LogTarget,
    fields: BTreeMap<String, String>,
}

impl log::Log for MedgateLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= self.level.filter()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = self.format.format_entry(&LogEntry::from_record(record, &self.fields));
        let _ = match self.target {
            LogTarget::Stdout => writeln!(io::stdout().lock(), "{}", line),
            LogTarget::Stderr => writeln!(io::stderr().lock(), "{}", line),
        };
    }

    fn flush(&self) {
        let _ = match self.target {
            LogTarget::Stdout => io::stdout().flush(),
            LogTarget::Stderr => io::stderr().flush(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_settings_are_rejected_before_install() {
        let config = LoggingConfig { format: "xml".to_string(), ..Default::default() };
        assert!(init_logging(&config).is_err());
    }

    #[test]
    fn test_target_parse() {
        assert_eq!("stderr".parse::<LogTarget>(), Ok(LogTarget::Stderr));
        assert!("file".parse::<LogTarget>().is_err());
    }
}
