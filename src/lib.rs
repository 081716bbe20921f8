//! splitlog - per-severity log files with size-based rotation and age-based retention
//!
//! Routes leveled, structured log records into three files (`debug.log`,
//! `app.log`, `error.log`); each file rolls over to a dated, numbered
//! archive once it crosses a size threshold, and archives past the
//! retention window are pruned. No external log-rotation daemon required.

pub mod config;
pub mod format;
pub mod record;
pub mod request;
pub mod router;
pub mod sink;

pub use config::LogConfig;
pub use format::LineFormatter;
pub use record::{Context, LogRecord, Severity, SeverityBand};
pub use request::{RequestInfo, ResponseInfo};
pub use router::LogRouter;
pub use sink::{RotatingSink, RotationPolicy};
