use super::{Formatter, field_key, timestamp};
use crate::{Entry, FormatError, Level};

use serde_json::Value;
use std::borrow::Cow;
use std::io::Write;
use termcolor::{Buffer, Color, ColorSpec, WriteColor};

/// Width the message is padded to in colored output
const MESSAGE_WIDTH: usize = 44;

/// `key=value` text formatter, colored for terminals unless disabled
#[derive(Debug, Clone, Default)]
pub struct TextFormatter {
    disable_colors: bool,
    disable_timestamp: bool,
    timestamp_format: Option<String>,
}

impl TextFormatter {
    /// Create a formatter with colors and RFC 3339 timestamps
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable ANSI colors
    #[must_use]
    pub fn with_colors(mut self, enabled: bool) -> Self {
        self.disable_colors = !enabled;
        self
    }

    /// The same formatter with colors disabled
    #[must_use]
    pub fn without_colors(&self) -> Self {
        Self {
            disable_colors: true,
            ..self.clone()
        }
    }

    /// Omit the timestamp from rendered entries
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

    /// Whether this formatter emits ANSI colors
    #[must_use]
    pub const fn colors_enabled(&self) -> bool {
        !self.disable_colors
    }

    fn write_plain(&self, buf: &mut impl Write, entry: &Entry) -> Result<(), FormatError> {
        let mut pairs: Vec<(Cow<'_, str>, String)> = Vec::with_capacity(entry.fields.len() + 3);

        if !self.disable_timestamp {
            let time = timestamp(&entry.time, self.timestamp_format.as_deref())?;
            pairs.push(("time".into(), time));
        }
        pairs.push(("level".into(), entry.level.to_string()));
        if !entry.message.is_empty() {
            pairs.push(("msg".into(), entry.message.clone()));
        }
        for (key, value) in &entry.fields {
            pairs.push((field_key(key).into(), value_text(value)));
        }

        for (i, (key, value)) in pairs.iter().enumerate() {
            if i > 0 {
                buf.write_all(b" ")?;
            }
            write!(buf, "{key}={}", quoted(value))?;
        }

        Ok(())
    }

    fn write_colored(&self, buf: &mut Buffer, entry: &Entry) -> Result<(), FormatError> {
        let mut spec = ColorSpec::new();
        spec.set_fg(Some(level_color(entry.level)));

        buf.set_color(&spec)?;
        buf.write_all(level_tag(entry.level).as_bytes())?;
        buf.reset()?;

        if self.disable_timestamp {
            buf.write_all(b" ")?;
        } else {
            let time = timestamp(&entry.time, self.timestamp_format.as_deref())?;
            write!(buf, "[{time}] ")?;
        }
        write!(buf, "{:<width$}", entry.message, width = MESSAGE_WIDTH)?;

        for (key, value) in &entry.fields {
            buf.write_all(b" ")?;
            buf.set_color(&spec)?;
            buf.write_all(key.as_bytes())?;
            buf.reset()?;
            write!(buf, "={}", quoted(&value_text(value)))?;
        }

        Ok(())
    }
}

impl Formatter for TextFormatter {
    fn format(&self, entry: &Entry) -> Result<Vec<u8>, FormatError> {
        let mut buf = if self.disable_colors {
            Buffer::no_color()
        } else {
            Buffer::ansi()
        };

        if self.disable_colors {
            self.write_plain(&mut buf, entry)?;
        } else {
            self.write_colored(&mut buf, entry)?;
        }
        buf.write_all(b"\n")?;

        Ok(buf.into_inner())
    }

    fn as_text(&self) -> Option<&TextFormatter> {
        Some(self)
    }
}

const fn level_color(level: Level) -> Color {
    match level {
        Level::Trace | Level::Debug => Color::White,
        Level::Info => Color::Cyan,
        Level::Warn => Color::Yellow,
        Level::Error | Level::Fatal | Level::Panic => Color::Red,
    }
}

/// Four character uppercase tag, e.g. `INFO` or `ERRO`
fn level_tag(level: Level) -> String {
    let name = level.as_str();
    name.get(..4).unwrap_or(name).to_ascii_uppercase()
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn needs_quoting(text: &str) -> bool {
    text.is_empty()
        || !text.chars().all(|c| {
            c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '/' | '@' | '^' | '+')
        })
}

fn quoted(text: &str) -> Cow<'_, str> {
    if needs_quoting(text) {
        Cow::Owned(format!("{text:?}"))
    } else {
        Cow::Borrowed(text)
    }
}
