use super::{Formatter, field_key, timestamp};
use crate::{Entry, FormatError};

use serde_json::{Map, Value};

/// One JSON object per entry
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    disable_timestamp: bool,
    timestamp_format: Option<String>,
    pretty_print: bool,
}

impl JsonFormatter {
    /// Create a compact JSON formatter with RFC 3339 timestamps
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Omit the `time` key
    #[must_use]
    pub fn with_timestamp_disabled(mut self, disabled: bool) -> Self {
        self.disable_timestamp = disabled;
        self
    }

    /// Render timestamps with a chrono format string instead of RFC 3339
    #[must_use]
    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = Some(format.into());
        self
    }

    /// Indent the emitted JSON
    #[must_use]
    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, entry: &Entry) -> Result<Vec<u8>, FormatError> {
        let mut object = Map::with_capacity(entry.fields.len() + 3);

        for (key, value) in &entry.fields {
            object.insert(field_key(key), value.clone());
        }
        if !self.disable_timestamp {
            let time = timestamp(&entry.time, self.timestamp_format.as_deref())?;
            object.insert("time".to_string(), Value::String(time));
        }
        object.insert("level".to_string(), entry.level.as_str().into());
        object.insert("msg".to_string(), entry.message.clone().into());

        let mut out = if self.pretty_print {
            serde_json::to_vec_pretty(&object)?
        } else {
            serde_json::to_vec(&object)?
        };
        out.push(b'\n');

        Ok(out)
    }
}
