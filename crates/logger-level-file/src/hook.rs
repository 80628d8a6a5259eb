//! The handler capability a logging pipeline attaches sinks through

use crate::{Event, Level, Result};

/// A sink the pipeline invokes for every event at one of its levels
pub trait Hook: Send + Sync + 'static {
    /// Levels this hook wants to receive
    fn levels(&self) -> &[Level];

    /// Handle a single event
    ///
    /// # Errors
    ///
    /// Returns an error if the event could not be delivered.
    fn fire(&self, event: &mut dyn Event) -> Result<()>;

    /// Whether the hook wants events at `level`
    fn handles(&self, level: Level) -> bool {
        self.levels().contains(&level)
    }
}
