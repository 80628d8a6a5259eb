//! Routes entries to files by level

use crate::{Error, Event, FormatError, Formatter, Hook, Level, Result, TextFormatter};

use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Owner read/write, everyone else read
#[cfg(unix)]
const LOG_FILE_MODE: u32 = 0o644;

/// Hook that appends every entry to the file configured for its level.
///
/// Several levels may share a file, but a level always maps to exactly one
/// file. Files are opened, appended to and closed on every call, so they may
/// be rotated or removed externally at any time.
///
/// Entries rendered with a [`TextFormatter`] are written without colors: the
/// sink swaps its own color-free formatter into the entry for the duration of
/// the write and restores the original afterwards.
pub struct LevelFileSink {
    paths: HashMap<Level, PathBuf>,
    levels: Vec<Level>,
    /// Held for the whole of `fire`, so it also serializes file writes
    formatter: Mutex<Option<Arc<dyn Formatter>>>,
}

impl LevelFileSink {
    /// Create a sink writing each level to the given path.
    ///
    /// No files are touched until the first entry arrives.
    pub fn new<P: Into<PathBuf>>(paths: impl IntoIterator<Item = (Level, P)>) -> Self {
        Self::from_parts(
            paths.into_iter().map(|(level, path)| (level, path.into())),
            Some(default_formatter()),
        )
    }

    /// Start building a sink
    #[must_use]
    pub fn builder() -> LevelFileSinkBuilder {
        LevelFileSinkBuilder::default()
    }

    fn from_parts(
        paths: impl IntoIterator<Item = (Level, PathBuf)>,
        formatter: Option<Arc<dyn Formatter>>,
    ) -> Self {
        let paths: HashMap<Level, PathBuf> = paths.into_iter().collect();

        let mut levels: Vec<Level> = paths.keys().copied().collect();
        levels.sort_unstable();

        debug!(
            ?levels,
            formatter_override = formatter.is_some(),
            "level file sink configured"
        );

        Self {
            paths,
            levels,
            formatter: Mutex::new(formatter),
        }
    }

    /// Levels this sink has a file for
    #[must_use]
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// The file entries at `level` are appended to
    #[must_use]
    pub fn path(&self, level: Level) -> Option<&Path> {
        self.paths.get(&level).map(PathBuf::as_path)
    }

    /// Replace the formatter used for text entries.
    ///
    /// Text formatters are always stored with colors disabled.
    pub fn set_formatter(&self, formatter: Arc<dyn Formatter>) {
        let formatter = colorless(formatter);
        debug!("replacing level file sink formatter");

        *self.formatter.lock() = Some(formatter);
    }

    /// Stop overriding the formatter of text entries
    pub fn clear_formatter(&self) {
        debug!("clearing level file sink formatter");

        *self.formatter.lock() = None;
    }

    /// Append the rendered entry to the file configured for its level.
    ///
    /// Failures are also reported on stderr, as pipelines commonly drop hook
    /// errors.
    ///
    /// # Errors
    ///
    /// Returns an error if no file is configured for the entry's level, the
    /// entry cannot be rendered, or the file cannot be opened or written.
    pub fn fire(&self, event: &mut dyn Event) -> Result<()> {
        let result = self.fire_locked(event);

        if let Err(err) = &result {
            let _ = writeln!(io::stderr().lock(), "level file sink: {err}");
        }

        result
    }

    fn fire_locked(&self, event: &mut dyn Event) -> Result<()> {
        let slot = self.formatter.lock();
        let level = event.level();
        let path = self.paths.get(&level).ok_or(Error::UnroutedLevel(level))?;

        let payload = match &*slot {
            Some(formatter) if event.formatter().as_text().is_some() => {
                render_with(event, Arc::clone(formatter))
            }
            _ => event.render(),
        }
        .map_err(Error::Render)?;

        append(path, &payload)
    }
}

impl Hook for LevelFileSink {
    fn levels(&self) -> &[Level] {
        Self::levels(self)
    }

    fn fire(&self, event: &mut dyn Event) -> Result<()> {
        Self::fire(self, event)
    }
}

impl fmt::Debug for LevelFileSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LevelFileSink")
            .field("paths", &self.paths)
            .field("levels", &self.levels)
            .finish_non_exhaustive()
    }
}

/// Builder for [`LevelFileSink`]
#[derive(Default)]
pub struct LevelFileSinkBuilder {
    paths: Vec<(Level, PathBuf)>,
    formatter: Option<Arc<dyn Formatter>>,
    without_override: bool,
}

impl LevelFileSinkBuilder {
    /// Append entries at `level` to `path`, replacing any earlier route for `level`
    #[must_use]
    pub fn route(mut self, level: Level, path: impl Into<PathBuf>) -> Self {
        self.paths.push((level, path.into()));
        self
    }

    /// Append entries at each of `levels` to `path`
    #[must_use]
    pub fn routes(
        mut self,
        levels: impl IntoIterator<Item = Level>,
        path: impl Into<PathBuf>,
    ) -> Self {
        let path = path.into();
        self.paths
            .extend(levels.into_iter().map(|level| (level, path.clone())));
        self
    }

    /// Formatter swapped in for text entries
    #[must_use]
    pub fn formatter(mut self, formatter: Arc<dyn Formatter>) -> Self {
        self.formatter = Some(formatter);
        self
    }

    /// Render every entry with its own formatter, colors included
    #[must_use]
    pub fn without_formatter_override(mut self) -> Self {
        self.without_override = true;
        self
    }

    /// Build the sink
    #[must_use]
    pub fn build(self) -> LevelFileSink {
        let formatter = if self.without_override {
            None
        } else {
            Some(self.formatter.map_or_else(default_formatter, colorless))
        };

        LevelFileSink::from_parts(self.paths, formatter)
    }
}

fn default_formatter() -> Arc<dyn Formatter> {
    Arc::new(TextFormatter::new().without_colors())
}

fn colorless(formatter: Arc<dyn Formatter>) -> Arc<dyn Formatter> {
    let stripped = formatter
        .as_text()
        .filter(|text| text.colors_enabled())
        .map(TextFormatter::without_colors);

    if let Some(text) = stripped {
        return Arc::new(text);
    }

    formatter
}

fn render_with(
    event: &mut dyn Event,
    formatter: Arc<dyn Formatter>,
) -> std::result::Result<Vec<u8>, FormatError> {
    let original = event.formatter();
    let mut event = scopeguard::guard(event, move |event| event.set_formatter(original));

    event.set_formatter(formatter);
    event.render()
}

fn append(path: &Path, payload: &[u8]) -> Result<()> {
    let mut file = open_append(path).map_err(|source| Error::Open {
        path: path.to_path_buf(),
        source,
    })?;

    file.write_all(payload).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn open_append(path: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.append(true).create(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(LOG_FILE_MODE);
    }

    options.open(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::JsonFormatter;

    fn stored_text(sink: &LevelFileSink) -> Option<TextFormatter> {
        let slot = sink.formatter.lock();
        match &*slot {
            Some(formatter) => formatter.as_text().cloned(),
            None => None,
        }
    }

    #[test]
    fn test_levels_are_routing_keys() {
        let sink = LevelFileSink::new([
            (Level::Info, "/tmp/a.log"),
            (Level::Error, "/tmp/a.log"),
            (Level::Warn, "/tmp/b.log"),
        ]);

        assert_eq!(sink.levels(), &[Level::Info, Level::Warn, Level::Error]);
        assert_eq!(sink.path(Level::Error), Some(Path::new("/tmp/a.log")));
        assert_eq!(sink.path(Level::Debug), None);
    }

    #[test]
    fn test_construction_touches_no_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("app.log");

        let sink = LevelFileSink::new([(Level::Info, &path)]);

        assert_eq!(sink.levels(), &[Level::Info]);
        assert!(!path.exists());
        assert!(!path.parent().unwrap().exists());
    }

    #[test]
    fn test_default_override_is_colorless_text() {
        let sink = LevelFileSink::new([(Level::Info, "/tmp/a.log")]);
        let text = stored_text(&sink).unwrap();
        assert!(!text.colors_enabled());
    }

    #[test]
    fn test_set_formatter_strips_colors() {
        let sink = LevelFileSink::new([(Level::Info, "/tmp/a.log")]);

        sink.set_formatter(Arc::new(TextFormatter::new().with_timestamp_disabled(true)));

        let text = stored_text(&sink).unwrap();
        assert!(!text.colors_enabled());
    }

    #[test]
    fn test_set_formatter_keeps_json() {
        let sink = LevelFileSink::new([(Level::Info, "/tmp/a.log")]);

        sink.set_formatter(Arc::new(JsonFormatter::new()));

        assert!(sink.formatter.lock().is_some());
        assert!(stored_text(&sink).is_none());
    }

    #[test]
    fn test_clear_formatter() {
        let sink = LevelFileSink::new([(Level::Info, "/tmp/a.log")]);
        sink.clear_formatter();
        assert!(sink.formatter.lock().is_none());
    }

    #[test]
    fn test_builder() {
        let sink = LevelFileSink::builder()
            .routes([Level::Info, Level::Debug], "/tmp/app.log")
            .route(Level::Error, "/tmp/error.log")
            .route(Level::Debug, "/tmp/debug.log")
            .formatter(Arc::new(TextFormatter::new()))
            .build();

        assert_eq!(sink.levels(), &[Level::Debug, Level::Info, Level::Error]);
        assert_eq!(sink.path(Level::Debug), Some(Path::new("/tmp/debug.log")));
        assert!(!stored_text(&sink).unwrap().colors_enabled());

        let bare = LevelFileSink::builder()
            .route(Level::Info, "/tmp/app.log")
            .without_formatter_override()
            .build();
        assert!(bare.formatter.lock().is_none());
    }

    #[test]
    fn test_hook_handles() {
        let sink = LevelFileSink::new([(Level::Warn, "/tmp/warn.log")]);
        let hook: &dyn Hook = &sink;

        assert!(hook.handles(Level::Warn));
        assert!(!hook.handles(Level::Info));
    }
}
