//! Severity routing across per-band rotating sinks
//!
//! The router owns three sinks, each gated to a severity band and writing
//! to its own file. A log call fans out to every sink whose band contains
//! the record's severity. No router call returns an error: logging must
//! never take the host application down.

use std::sync::Mutex;

use anyhow::{Context as _, Result};
use serde_json::Value;

use crate::config::LogConfig;
use crate::format::LineFormatter;
use crate::record::{Context, LogRecord, Severity, SeverityBand};
use crate::request::{RequestInfo, ResponseInfo};
use crate::sink::RotatingSink;

/// One sink plus the band of severities it accepts
struct BandedSink {
    band: SeverityBand,
    sink: Mutex<RotatingSink>,
}

/// Leveled logger writing per-severity files with rotation and retention
///
/// Routes records to `debug.log` (DEBUG only), `app.log` (INFO..WARNING),
/// and `error.log` (ERROR..EMERGENCY) under the configured directory. The
/// mutexes serialize callers inside this process; a given log directory
/// must still be owned by a single process.
pub struct LogRouter {
    channel: String,
    formatter: LineFormatter,
    sinks: Vec<BandedSink>,
}

impl LogRouter {
    /// Build the router and its three sinks, creating the log directory if absent
    pub fn new(config: &LogConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.log_dir).context("Failed to create log directory")?;

        let policy = config.policy();
        let banded = |file: &str, band: SeverityBand| BandedSink {
            band,
            sink: Mutex::new(RotatingSink::new(config.log_dir.join(file), policy)),
        };

        Ok(Self {
            channel: config.channel.clone(),
            formatter: LineFormatter::new(config.timestamp_format.clone()),
            sinks: vec![
                banded("debug.log", SeverityBand::single(Severity::Debug)),
                banded(
                    "app.log",
                    SeverityBand::new(Severity::Info, Severity::Warning),
                ),
                banded(
                    "error.log",
                    SeverityBand::new(Severity::Error, Severity::Emergency),
                ),
            ],
        })
    }

    /// Channel name stamped into every record
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Log at an arbitrary severity
    pub fn log(&self, severity: Severity, message: impl Into<String>, context: Context) {
        let record = LogRecord::new(severity, self.channel.clone(), message, context);
        self.dispatch(&record);
    }

    pub fn debug(&self, message: impl Into<String>, context: Context) {
        self.log(Severity::Debug, message, context);
    }

    pub fn info(&self, message: impl Into<String>, context: Context) {
        self.log(Severity::Info, message, context);
    }

    pub fn notice(&self, message: impl Into<String>, context: Context) {
        self.log(Severity::Notice, message, context);
    }

    pub fn warning(&self, message: impl Into<String>, context: Context) {
        self.log(Severity::Warning, message, context);
    }

    pub fn error(&self, message: impl Into<String>, context: Context) {
        self.log(Severity::Error, message, context);
    }

    pub fn critical(&self, message: impl Into<String>, context: Context) {
        self.log(Severity::Critical, message, context);
    }

    pub fn alert(&self, message: impl Into<String>, context: Context) {
        self.log(Severity::Alert, message, context);
    }

    pub fn emergency(&self, message: impl Into<String>, context: Context) {
        self.log(Severity::Emergency, message, context);
    }

    /// Log a completed HTTP request at INFO
    ///
    /// `duration_secs` is the wall-clock handling time; it lands in the
    /// context as milliseconds rounded to two decimal places.
    pub fn log_request(
        &self,
        request: &RequestInfo,
        response: Option<&ResponseInfo>,
        duration_secs: f64,
    ) {
        let context = Context::new()
            .with("method", request.method.clone())
            .with("uri", request.uri.clone())
            .with(
                "ip",
                request.client_ip.clone().unwrap_or_else(|| "unknown".to_string()),
            )
            .with(
                "user_agent",
                request
                    .user_agent
                    .clone()
                    .unwrap_or_else(|| "unknown".to_string()),
            )
            .with(
                "response_status",
                response.map(|r| Value::from(r.status)).unwrap_or(Value::Null),
            )
            .with("duration_ms", round2(duration_secs * 1000.0));

        self.info("Request", context);
    }

    /// Log a caught error at ERROR, with the request that triggered it
    ///
    /// Records the call site as the source location and the full error
    /// chain as the trace.
    #[track_caller]
    pub fn log_exception(&self, error: &anyhow::Error, request: &RequestInfo) {
        let location = std::panic::Location::caller();
        let context = Context::new()
            .with("message", error.to_string())
            .with("file", location.file())
            .with("line", location.line())
            .with("trace", format!("{:?}", error))
            .with("method", request.method.clone())
            .with("uri", request.uri.clone())
            .with(
                "ip",
                request.client_ip.clone().unwrap_or_else(|| "unknown".to_string()),
            );

        self.error("Exception", context);
    }

    /// Format the record once and hand it to every sink whose band matches
    ///
    /// An append failure is reported to standard error and dropped; the
    /// host's primary logic never sees it.
    fn dispatch(&self, record: &LogRecord) {
        let line = self.formatter.format(record);
        for banded in &self.sinks {
            if !banded.band.contains(record.severity) {
                continue;
            }
            if let Ok(mut sink) = banded.sink.lock() {
                if let Err(err) = sink.write(&line) {
                    eprintln!(
                        "splitlog: failed to write {}: {}",
                        sink.path().display(),
                        err
                    );
                }
            }
        }
    }
}

/// Round to two decimal places for millisecond durations
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
