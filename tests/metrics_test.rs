//! Tests for metrics integration.
//!
//! Uses `metrics_util::debugging::DebuggingRecorder` to capture and assert
//! on emitted metrics without needing a real exporter.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use metrics_util::MetricKind;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};

use verdandi::cache::{CacheConfig, ResponseCache};
use verdandi::governor::{Candidate, RequestGovernor};
use verdandi::limiter::RateLimiter;
use verdandi::telemetry;
use verdandi::types::{Completion, CompletionOptions};
use verdandi::{CompletionProvider, Result};

// ============================================================================
// Mock provider
// ============================================================================

struct MockProvider;

#[async_trait]
impl CompletionProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(
        &self,
        _model: &str,
        _prompt: &str,
        _options: &CompletionOptions,
    ) -> Result<Completion> {
        Ok(Completion {
            text: r#"{"v": 1}"#.to_string(),
            tokens_used: 7,
        })
    }
}

fn governor() -> RequestGovernor<serde_json::Value> {
    RequestGovernor::new(
        vec![Candidate::new("test/model", 0.001, Arc::new(MockProvider))],
        CompletionOptions::default(),
        RateLimiter::new(10, 0.0),
        ResponseCache::new(&CacheConfig::new().max_entries(8).ttl(Duration::from_secs(3600))),
    )
}

// ============================================================================
// Snapshot helpers
// ============================================================================

type SnapshotVec = Vec<(
    metrics_util::CompositeKey,
    Option<metrics::Unit>,
    Option<metrics::SharedString>,
    DebugValue,
)>;

/// Sum all counter values matching a given metric name.
fn counter_total(snapshot: &SnapshotVec, name: &str) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| key.kind() == MetricKind::Counter && key.key().name() == name)
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

/// Check if any histogram entries exist for a given metric name.
fn has_histogram(snapshot: &SnapshotVec, name: &str) -> bool {
    snapshot
        .iter()
        .any(|(key, _, _, _)| key.kind() == MetricKind::Histogram && key.key().name() == name)
}

// ============================================================================
// Tests
// ============================================================================

/// Runs async code within a local recorder scope on the multi-thread
/// runtime. `block_in_place` keeps the sync `with_local_recorder` closure
/// on the current thread while `block_on` drives the async work.
#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn governed_request_records_metrics() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let result = metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let gov = governor();
                gov.request("prompt", "ns").await
            })
        })
    });
    assert!(result.is_ok());

    let snapshot = snapshotter.snapshot().into_vec();

    assert_eq!(counter_total(&snapshot, telemetry::REQUESTS_TOTAL), 1);
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_MISSES_TOTAL), 1);
    assert_eq!(counter_total(&snapshot, telemetry::TOKENS_TOTAL), 7);
    assert!(
        has_histogram(&snapshot, telemetry::REQUEST_DURATION_SECONDS),
        "expected a duration histogram entry"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn cache_hits_and_rate_limit_denials_are_counted() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let gov = governor();
                let _ = gov.request("prompt", "ns").await;
                let _ = gov.request("prompt", "ns").await; // cache hit

                let denied = RequestGovernor::<serde_json::Value>::new(
                    Vec::new(),
                    CompletionOptions::default(),
                    RateLimiter::new(0, 0.0),
                    ResponseCache::new(&CacheConfig::new()),
                );
                let _ = denied.request("prompt", "ns").await;
            })
        })
    });

    let snapshot = snapshotter.snapshot().into_vec();

    assert_eq!(counter_total(&snapshot, telemetry::CACHE_HITS_TOTAL), 1);
    assert_eq!(counter_total(&snapshot, telemetry::RATE_LIMIT_DENIED_TOTAL), 1);
}

#[tokio::test]
async fn metrics_are_noop_without_recorder() {
    // Verify no panics when no recorder is installed.
    let gov = governor();
    let result = gov.request("prompt", "ns").await.unwrap();
    assert!(result.is_some());
}
