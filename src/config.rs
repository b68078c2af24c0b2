use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(Error::InvalidConfig(format!("unknown log level: {other}"))),
        }
    }
}

/// Command-line style switches layered over [`HarnessConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flags {
    pub debug: bool,
    pub verbose: bool,
    pub log_level: Option<LogLevel>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    pub flags: Flags,
    pub log_level: Option<LogLevel>,
    pub trace: bool,
    pub trace_events: bool,
    pub trace_to_stderr: bool,
    pub trace_log_limit: usize,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            flags: Flags::default(),
            log_level: None,
            trace: false,
            trace_events: true,
            trace_to_stderr: true,
            trace_log_limit: 10_000,
        }
    }
}

impl HarnessConfig {
    /// `debug`/`verbose` flags win, then an explicit flag level, then the
    /// configured level, then `info`.
    pub fn resolved_log_level(&self) -> LogLevel {
        if self.flags.debug || self.flags.verbose {
            LogLevel::Debug
        } else if let Some(level) = self.flags.log_level {
            level
        } else {
            self.log_level.unwrap_or(LogLevel::Info)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.trace_log_limit == 0 {
            return Err(Error::InvalidConfig(
                "trace_log_limit requires at least 1 entry".into(),
            ));
        }
        Ok(())
    }
}
