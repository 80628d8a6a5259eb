//! Formatters that turn entries into text

mod json;
mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;

use crate::{Entry, FormatError};

use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt::Write;

/// Keys every formatter emits itself; entry fields using them get prefixed
const RESERVED_KEYS: [&str; 3] = ["time", "level", "msg"];

/// Renders an entry to the bytes appended to a log destination
pub trait Formatter: Send + Sync + 'static {
    /// Render the entry, including the trailing newline
    ///
    /// # Errors
    ///
    /// Returns an error if the entry cannot be represented by this formatter.
    fn format(&self, entry: &Entry) -> Result<Vec<u8>, FormatError>;

    /// Returns the text formatter if this formatter belongs to the plain-text family
    fn as_text(&self) -> Option<&TextFormatter> {
        None
    }
}

fn field_key(key: &str) -> String {
    if RESERVED_KEYS.contains(&key) {
        format!("fields.{key}")
    } else {
        key.to_string()
    }
}

fn timestamp(time: &DateTime<Utc>, format: Option<&str>) -> Result<String, FormatError> {
    let Some(format) = format else {
        return Ok(time.to_rfc3339_opts(SecondsFormat::Secs, true));
    };

    let mut out = String::new();
    write!(out, "{}", time.format(format))
        .map_err(|_| FormatError::Custom(format!("invalid timestamp format: {format}")))?;
    Ok(out)
}
