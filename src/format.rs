//! Line formatting for log records
//!
//! Renders every record through the fixed template
//! `[{timestamp}] {channel}.{LEVEL}: {message} {context} {extra}` with a
//! configurable timestamp pattern.

use crate::record::{Context, LogRecord};

/// Default timestamp pattern: seconds-precision local datetime
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats records into single newline-terminated lines
#[derive(Debug, Clone)]
pub struct LineFormatter {
    timestamp_format: String,
}

impl Default for LineFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_TIMESTAMP_FORMAT)
    }
}

impl LineFormatter {
    /// Create a formatter with a chrono timestamp pattern
    pub fn new(timestamp_format: impl Into<String>) -> Self {
        Self {
            timestamp_format: timestamp_format.into(),
        }
    }

    /// Render one record as a newline-terminated line
    pub fn format(&self, record: &LogRecord) -> String {
        format!(
            "[{}] {}.{}: {} {} {}\n",
            record.timestamp.format(&self.timestamp_format),
            record.channel,
            record.severity.as_str(),
            record.message,
            render_context(&record.context),
            render_context(&record.extra),
        )
    }
}

/// Render a context as a JSON object in insertion order
///
/// An empty context renders as `[]`, keeping lines byte-compatible with
/// consumers of the previous generation of these log files.
fn render_context(context: &Context) -> String {
    if context.is_empty() {
        return "[]".to_string();
    }

    let mut out = String::from("{");
    for (i, (key, value)) in context.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        // serde_json never fails on plain strings or Value trees; fall back
        // to null rather than poison the write path
        let rendered_key =
            serde_json::to_string(key).unwrap_or_else(|_| "\"\"".to_string());
        let rendered = serde_json::to_string(value).unwrap_or_else(|_| "null".to_string());
        out.push_str(&rendered_key);
        out.push(':');
        out.push_str(&rendered);
    }
    out.push('}');
    out
}
