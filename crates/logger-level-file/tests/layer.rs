//! Tests for driving the sink from tracing

#![cfg(feature = "tracing-compat")]

use proven_logger_level_file::{HookLayer, JsonFormatter, Level, LevelFileSink};
use std::fs;
use std::sync::Arc;
use tempfile::tempdir;
use tracing_subscriber::layer::SubscriberExt;

#[test]
fn test_tracing_events_are_routed() {
    let dir = tempdir().unwrap();
    let info = dir.path().join("info.log");
    let errors = dir.path().join("error.log");

    let sink = Arc::new(LevelFileSink::new([
        (Level::Info, &info),
        (Level::Error, &errors),
    ]));
    let subscriber = tracing_subscriber::registry().with(HookLayer::new(sink));

    tracing::subscriber::with_default(subscriber, || {
        tracing::info!(user = "alice", attempts = 3, "logged in");
        tracing::error!(code = 500, "request failed");
        tracing::debug!("not routed");
    });

    let info_contents = fs::read_to_string(&info).unwrap();
    assert!(info_contents.contains("level=info"));
    assert!(info_contents.contains("msg=\"logged in\""));
    assert!(info_contents.contains("user=alice"));
    assert!(info_contents.contains("attempts=3"));
    assert!(!info_contents.contains('\x1b'));
    assert!(!info_contents.contains("not routed"));

    let error_contents = fs::read_to_string(&errors).unwrap();
    assert!(error_contents.contains("msg=\"request failed\""));
    assert!(error_contents.contains("code=500"));
    assert_eq!(error_contents.lines().count(), 1);
}

#[test]
fn test_layer_formatter_is_used() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("app.log");

    let sink = Arc::new(LevelFileSink::new([(Level::Warn, &path)]));
    let layer = HookLayer::new(sink).with_formatter(Arc::new(JsonFormatter::new()));
    let subscriber = tracing_subscriber::registry().with(layer);

    tracing::subscriber::with_default(subscriber, || {
        tracing::warn!(latency_ms = 1500_u64, "slow");
    });

    let line: serde_json::Value =
        serde_json::from_str(fs::read_to_string(&path).unwrap().trim_end()).unwrap();
    assert_eq!(line["level"], "warn");
    assert_eq!(line["msg"], "slow");
    assert_eq!(line["latency_ms"], 1500);
}
