use std::collections::VecDeque;

use crate::config::{HarnessConfig, LogLevel};
use crate::{Error, Result};

/// Bounded, harness-readable log of dispatch activity.
#[derive(Debug, Clone)]
pub struct TraceState {
    pub(crate) enabled: bool,
    pub(crate) events: bool,
    pub(crate) level: LogLevel,
    pub(crate) logs: VecDeque<String>,
    pub(crate) log_limit: usize,
    pub(crate) to_stderr: bool,
}

impl Default for TraceState {
    fn default() -> Self {
        Self {
            enabled: false,
            events: true,
            level: LogLevel::Info,
            logs: VecDeque::new(),
            log_limit: 10_000,
            to_stderr: true,
        }
    }
}

impl TraceState {
    pub fn from_config(config: &HarnessConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            enabled: config.trace,
            events: config.trace_events,
            level: config.resolved_log_level(),
            logs: VecDeque::new(),
            log_limit: config.trace_log_limit,
            to_stderr: config.trace_to_stderr,
        })
    }

    pub fn wants(&self, level: LogLevel) -> bool {
        self.enabled && self.events && level >= self.level
    }

    pub fn set_log_limit(&mut self, max_entries: usize) -> Result<()> {
        if max_entries == 0 {
            return Err(Error::InvalidConfig(
                "set_trace_log_limit requires at least 1 entry".into(),
            ));
        }
        self.log_limit = max_entries;
        while self.logs.len() > self.log_limit {
            self.logs.pop_front();
        }
        Ok(())
    }

    pub fn record(&mut self, level: LogLevel, line: String) {
        if !self.wants(level) {
            return;
        }
        if self.to_stderr {
            emit(level, &line);
        }
        self.buffer(line);
    }

    /// Stores a line without forwarding it to `tracing`. For callers that
    /// already reported the same message themselves.
    pub(crate) fn buffer(&mut self, line: String) {
        if self.logs.len() >= self.log_limit {
            self.logs.pop_front();
        }
        self.logs.push_back(line);
    }

    pub fn take_logs(&mut self) -> Vec<String> {
        std::mem::take(&mut self.logs).into()
    }
}

fn emit(level: LogLevel, line: &str) {
    match level {
        LogLevel::Debug => tracing::debug!(target: "mock_doc_events", "{line}"),
        LogLevel::Info => tracing::info!(target: "mock_doc_events", "{line}"),
        LogLevel::Warn => tracing::warn!(target: "mock_doc_events", "{line}"),
        LogLevel::Error => tracing::error!(target: "mock_doc_events", "{line}"),
    }
}
