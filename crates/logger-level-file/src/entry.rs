//! Log entries and the event capability hooks operate on

use crate::{FormatError, Formatter, Level};

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// What a hook may do with an event handed to it by the pipeline
pub trait Event {
    /// Severity of the event
    fn level(&self) -> Level;

    /// The formatter currently used to render the event
    fn formatter(&self) -> Arc<dyn Formatter>;

    /// Replace the formatter used to render the event
    fn set_formatter(&mut self, formatter: Arc<dyn Formatter>);

    /// Render the event with its current formatter
    fn render(&self) -> Result<Vec<u8>, FormatError>;
}

/// A structured log entry
#[derive(Clone)]
pub struct Entry {
    /// Log level
    pub level: Level,
    /// The log message
    pub message: String,
    /// Additional key/value data
    pub fields: BTreeMap<String, Value>,
    /// When the entry was created
    pub time: DateTime<Utc>,
    formatter: Arc<dyn Formatter>,
}

impl Entry {
    /// Create an entry stamped with the current time
    pub fn new(level: Level, message: impl Into<String>, formatter: Arc<dyn Formatter>) -> Self {
        Self {
            level,
            message: message.into(),
            fields: BTreeMap::new(),
            time: Utc::now(),
            formatter,
        }
    }

    /// Builder-style method for adding a field
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Builder-style method for adding several fields
    #[must_use]
    pub fn with_fields(mut self, fields: impl IntoIterator<Item = (String, Value)>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Builder-style method for setting the timestamp
    #[must_use]
    pub fn with_time(mut self, time: DateTime<Utc>) -> Self {
        self.time = time;
        self
    }
}

impl Event for Entry {
    fn level(&self) -> Level {
        self.level
    }

    fn formatter(&self) -> Arc<dyn Formatter> {
        Arc::clone(&self.formatter)
    }

    fn set_formatter(&mut self, formatter: Arc<dyn Formatter>) {
        self.formatter = formatter;
    }

    fn render(&self) -> Result<Vec<u8>, FormatError> {
        self.formatter.format(self)
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("level", &self.level)
            .field("message", &self.message)
            .field("fields", &self.fields)
            .field("time", &self.time)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{JsonFormatter, TextFormatter};

    #[test]
    fn test_render_uses_current_formatter() {
        let mut entry = Entry::new(
            Level::Info,
            "hello",
            Arc::new(TextFormatter::new().without_colors()),
        );
        let text = String::from_utf8(entry.render().unwrap()).unwrap();
        assert!(text.contains("msg=hello"));

        entry.set_formatter(Arc::new(JsonFormatter::new()));
        let json = String::from_utf8(entry.render().unwrap()).unwrap();
        assert!(json.contains("\"msg\":\"hello\""));
    }

    #[test]
    fn test_with_fields() {
        let entry = Entry::new(Level::Warn, "slow", Arc::new(JsonFormatter::new()))
            .with_field("elapsed_ms", 1200)
            .with_fields([("route".to_string(), Value::from("/health"))]);

        assert_eq!(entry.fields.len(), 2);
        assert_eq!(entry.fields["elapsed_ms"], Value::from(1200));
        assert_eq!(Event::level(&entry), Level::Warn);
    }
}
