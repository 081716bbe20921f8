//! Log records, severity levels, and structured context
//!
//! A [`LogRecord`] is immutable once constructed; the router builds one per
//! log call and every matching sink formats the same record.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Log severity, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Debug,
    Info,
    Notice,
    Warning,
    Error,
    Critical,
    Alert,
    Emergency,
}

impl Severity {
    /// Get the upper-case level name used in formatted lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Notice => "NOTICE",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
            Severity::Alert => "ALERT",
            Severity::Emergency => "EMERGENCY",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown severity name
#[derive(Debug, Error)]
#[error("unknown severity level: {0}")]
pub struct ParseSeverityError(String);

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Severity::Debug),
            "info" => Ok(Severity::Info),
            "notice" => Ok(Severity::Notice),
            "warning" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            "critical" => Ok(Severity::Critical),
            "alert" => Ok(Severity::Alert),
            "emergency" => Ok(Severity::Emergency),
            _ => Err(ParseSeverityError(s.to_string())),
        }
    }
}

/// Inclusive range of severities accepted by one sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeverityBand {
    min: Severity,
    max: Severity,
}

impl SeverityBand {
    /// Create a band covering `[min, max]` inclusive
    pub fn new(min: Severity, max: Severity) -> Self {
        Self { min, max }
    }

    /// Create a band that accepts a single severity
    pub fn single(severity: Severity) -> Self {
        Self {
            min: severity,
            max: severity,
        }
    }

    /// Check whether a severity falls inside this band
    pub fn contains(&self, severity: Severity) -> bool {
        self.min <= severity && severity <= self.max
    }
}

/// Insertion-ordered mapping of string keys to JSON values
///
/// Keys keep the order they were added in, so formatted lines list context
/// fields the way the call site wrote them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context(Vec<(String, Value)>);

impl Context {
    /// Create an empty context
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Add a key/value pair, consuming and returning the context
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Add a key/value pair in place
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.push((key.into(), value.into()));
    }

    /// Look up the first value stored under a key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Iterate over pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of pairs in the context
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check whether the context holds no pairs
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Context {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A single log record
#[derive(Debug, Clone)]
pub struct LogRecord {
    /// Timestamp when the record was created
    pub timestamp: DateTime<Local>,
    /// Severity level
    pub severity: Severity,
    /// Channel name of the logger that produced the record
    pub channel: String,
    /// Log message
    pub message: String,
    /// Structured context supplied by the call site
    pub context: Context,
    /// Extra fields, usually empty
    pub extra: Context,
}

impl LogRecord {
    /// Create a new record stamped with the current local time
    pub fn new(
        severity: Severity,
        channel: impl Into<String>,
        message: impl Into<String>,
        context: Context,
    ) -> Self {
        Self {
            timestamp: Local::now(),
            severity,
            channel: channel.into(),
            message: message.into(),
            context,
            extra: Context::new(),
        }
    }
}
