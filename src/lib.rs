//! Single-line JSON rendering of structured log entries.
//!
//! [`JsonFormatter`] turns a [`LogEntry`] into one JSON object followed by
//! a newline. Attributes live under `"fields"`; time, level and message
//! are written at the top level under configurable names, and any
//! attribute sharing one of those names is preserved as `"fields.<name>"`.
//! [`layer::JsonLayer`] plugs the formatter into `tracing`.

pub mod config;
pub mod entry;
pub mod error;
pub mod formatter;
pub mod init;
pub mod layer;
pub mod value;

pub use config::{FieldKey, FieldKeyMap, FormatterConfig, TimestampFormat};
pub use entry::{Level, LogEntry};
pub use error::{FormatError, InitError};
pub use formatter::{Formatter, JsonFormatter};
pub use value::{FieldValue, Fields};
