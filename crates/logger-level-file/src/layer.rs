//! Bridge from tracing to hooks

use crate::{Entry, Formatter, Hook, Level, TextFormatter};

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::Subscriber;
use tracing::field::{Field, Visit};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

/// A tracing layer that hands events to a hook
pub struct HookLayer {
    hook: Arc<dyn Hook>,
    formatter: Arc<dyn Formatter>,
}

impl HookLayer {
    /// Create a layer rendering entries with a colored text formatter
    pub fn new(hook: Arc<dyn Hook>) -> Self {
        Self {
            hook,
            formatter: Arc::new(TextFormatter::new()),
        }
    }

    /// Attach a different formatter to the entries built by this layer
    #[must_use]
    pub fn with_formatter(mut self, formatter: Arc<dyn Formatter>) -> Self {
        self.formatter = formatter;
        self
    }
}

impl<S> Layer<S> for HookLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let level = Level::from(*event.metadata().level());

        if !self.hook.handles(level) {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let mut entry = Entry::new(level, visitor.message, Arc::clone(&self.formatter))
            .with_fields(visitor.fields);

        // Layers cannot return errors; the hook reports its own failures.
        let _ = self.hook.fire(&mut entry);
    }
}

/// Splits the `message` field from the rest of an event's fields
#[derive(Default)]
struct FieldVisitor {
    message: String,
    fields: BTreeMap<String, Value>,
}

impl FieldVisitor {
    fn insert(&mut self, field: &Field, value: Value) {
        if field.name() == "message" {
            self.message = match value {
                Value::String(message) => message,
                other => other.to_string(),
            };
        } else {
            self.fields.insert(field.name().to_string(), value);
        }
    }
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, Value::from(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.insert(field, Value::String(format!("{value:?}")));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::from(value));
    }
}
