//! Logging hook that appends entries to files chosen by their level
//!
//! This crate provides a sink for logging pipelines that:
//! - Routes each entry to the file configured for its level
//! - Opens, appends and closes the file on every entry, under one lock
//! - Strips ANSI colors from text entries written to files
//! - Plugs into `tracing` through [`HookLayer`] (`tracing-compat` feature)
//!
//! ```no_run
//! use proven_logger_level_file::{Entry, Level, LevelFileSink, TextFormatter};
//! use std::sync::Arc;
//!
//! let sink = LevelFileSink::new([
//!     (Level::Info, "/var/log/app.log"),
//!     (Level::Error, "/var/log/app.log"),
//!     (Level::Warn, "/var/log/warn.log"),
//! ]);
//!
//! let mut entry = Entry::new(Level::Info, "started", Arc::new(TextFormatter::new()));
//! sink.fire(&mut entry).expect("failed to write log entry");
//! ```

#![warn(missing_docs, unreachable_pub)]
#![forbid(unsafe_code)]

mod config;
mod entry;
mod error;
mod formatter;
mod hook;
mod level;
mod sink;

#[cfg(feature = "tracing-compat")]
mod layer;

pub use config::{FormatterConfig, SinkConfig};
pub use entry::{Entry, Event};
pub use error::{Error, FormatError, Result};
pub use formatter::{Formatter, JsonFormatter, TextFormatter};
pub use hook::Hook;
#[cfg(feature = "tracing-compat")]
pub use layer::HookLayer;
pub use level::Level;
pub use sink::{LevelFileSink, LevelFileSinkBuilder};
