//! Sink configuration

use crate::{Error, Formatter, JsonFormatter, Level, LevelFileSink, Result, TextFormatter};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Configuration for a [`LevelFileSink`].
///
/// ```toml
/// [routes]
/// info = "/var/log/app.log"
/// error = "/var/log/app.log"
/// warn = "/var/log/warn.log"
///
/// [formatter]
/// kind = "text"
/// disable_timestamp = false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SinkConfig {
    /// File each level is appended to
    pub routes: BTreeMap<Level, PathBuf>,
    /// Formatter swapped in for text entries
    #[serde(default)]
    pub formatter: FormatterConfig,
}

/// Formatter the sink uses for text entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FormatterConfig {
    /// Color-free `key=value` text
    Text {
        /// Omit timestamps
        #[serde(default)]
        disable_timestamp: bool,
        /// chrono format string, RFC 3339 when unset
        #[serde(default)]
        timestamp_format: Option<String>,
    },
    /// One JSON object per line
    Json {
        /// Omit timestamps
        #[serde(default)]
        disable_timestamp: bool,
        /// chrono format string, RFC 3339 when unset
        #[serde(default)]
        timestamp_format: Option<String>,
        /// Indent the emitted JSON
        #[serde(default)]
        pretty_print: bool,
    },
    /// Keep each entry's own formatter
    None,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self::Text {
            disable_timestamp: false,
            timestamp_format: None,
        }
    }
}

impl FormatterConfig {
    fn build(&self) -> Option<Arc<dyn Formatter>> {
        match self {
            Self::Text {
                disable_timestamp,
                timestamp_format,
            } => {
                let mut formatter = TextFormatter::new()
                    .with_colors(false)
                    .with_timestamp_disabled(*disable_timestamp);
                if let Some(format) = timestamp_format {
                    formatter = formatter.with_timestamp_format(format.clone());
                }
                Some(Arc::new(formatter))
            }
            Self::Json {
                disable_timestamp,
                timestamp_format,
                pretty_print,
            } => {
                let mut formatter = JsonFormatter::new()
                    .with_timestamp_disabled(*disable_timestamp)
                    .with_pretty_print(*pretty_print);
                if let Some(format) = timestamp_format {
                    formatter = formatter.with_timestamp_format(format.clone());
                }
                Some(Arc::new(formatter))
            }
            Self::None => None,
        }
    }
}

impl SinkConfig {
    /// Parse a TOML configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid TOML, names an unknown
    /// level, or has an unexpected shape.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML configuration file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading level file sink configuration");

        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Io("failed to read sink configuration", e))?;

        Self::from_toml_str(&text)
    }

    /// Build the configured sink
    #[must_use]
    pub fn build(&self) -> LevelFileSink {
        let builder = self
            .routes
            .iter()
            .fold(LevelFileSink::builder(), |builder, (level, path)| {
                builder.route(*level, path.clone())
            });

        match self.formatter.build() {
            Some(formatter) => builder.formatter(formatter).build(),
            None => builder.without_formatter_override().build(),
        }
    }
}
