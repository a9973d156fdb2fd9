use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::config::{Config, MetricSpec};
use crate::monitor::{
    MonitorState,
    provider::{MockMetricsSource, sample},
};
use crate::notifier::RecordingNotifier;

use super::check_health_at;

fn test_config(summary_interval: u64) -> Config {
    Config {
        prometheus_url: "http://prometheus:9090".to_string(),
        webhook_url: "https://discord.example/hook".to_string(),
        poll_interval: 60,
        summary_interval,
        request_timeout_secs: 10,
        metrics: BTreeMap::from([(
            "cpu".to_string(),
            MetricSpec {
                query: "cpu_query".to_string(),
                max: Some(90.0),
                unit: "%".to_string(),
                emblem: "🔥".to_string(),
            },
        )]),
        instance_names: HashMap::new(),
    }
}

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap()
}

#[tokio::test]
async fn first_tick_flushes_immediately() {
    let config = test_config(180);
    let source = MockMetricsSource::new();
    source.respond("cpu_query", vec![sample("db1", 20.0)]);
    let notifier = RecordingNotifier::new();
    let mut state = MonitorState::default();

    let outcome = check_health_at(&source, &notifier, &config, &mut state, start()).await;

    assert!(outcome.flushed);
    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].starts_with("🩺 **Server Health Summary**\ndb1 — 🟢 UP\n🔥cpu: 20.00%"));
}

#[tokio::test]
async fn breach_is_buffered_until_summary_interval_elapses() {
    let config = test_config(180);
    let source = MockMetricsSource::new();
    let notifier = RecordingNotifier::new();
    let t0 = start();
    let mut state = MonitorState::flushed_at(t0);

    source.respond("cpu_query", vec![sample("db1", 95.0)]);
    let outcome = check_health_at(&source, &notifier, &config, &mut state, t0).await;
    assert_eq!(outcome.alerts_generated, 1);
    assert!(!outcome.flushed);
    assert!(notifier.sent().is_empty());
    assert_eq!(state.pending_alerts().len(), 1);

    source.respond("cpu_query", vec![sample("db1", 50.0)]);
    for offset in [60, 120] {
        let outcome =
            check_health_at(&source, &notifier, &config, &mut state, t0 + Duration::seconds(offset))
                .await;
        assert!(!outcome.flushed);
    }
    assert!(notifier.sent().is_empty());

    let outcome =
        check_health_at(&source, &notifier, &config, &mut state, t0 + Duration::seconds(185)).await;
    assert!(outcome.flushed);
    assert_eq!(outcome.messages_sent, 2);

    let sent = notifier.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent[0].contains("db1 — 🟢 UP\n🔥cpu: 50.00%"));
    assert!(sent[1].starts_with("⚠️ Alert: db1"));
    assert!(sent[1].contains("cpu 95.00% > 90%"));
    assert!(state.pending_alerts().is_empty());
}

#[tokio::test]
async fn silent_instance_is_reported_down_exactly_once() {
    let config = test_config(100_000);
    let source = MockMetricsSource::new();
    let notifier = RecordingNotifier::new();
    let t0 = start();
    let mut state = MonitorState::flushed_at(t0);

    source.respond("cpu_query", vec![sample("db1", 10.0)]);
    check_health_at(&source, &notifier, &config, &mut state, t0).await;
    assert_eq!(state.tracked_instances(), 1);

    source.clear();
    for offset in [60, 120] {
        let outcome =
            check_health_at(&source, &notifier, &config, &mut state, t0 + Duration::seconds(offset))
                .await;
        assert_eq!(outcome.instances_down, 0);
    }

    let outcome =
        check_health_at(&source, &notifier, &config, &mut state, t0 + Duration::seconds(180)).await;
    assert_eq!(outcome.instances_down, 1);
    assert_eq!(state.tracked_instances(), 0);

    let outcome =
        check_health_at(&source, &notifier, &config, &mut state, t0 + Duration::seconds(240)).await;
    assert_eq!(outcome.instances_down, 0);

    let down_alerts: Vec<&String> = state
        .pending_alerts()
        .iter()
        .filter(|alert| alert.contains("db1 is **DOWN**"))
        .collect();
    assert_eq!(down_alerts.len(), 1);
}

#[tokio::test]
async fn failed_sends_still_clear_buffer_and_reset_timer() {
    let config = test_config(180);
    let source = MockMetricsSource::new();
    source.respond("cpu_query", vec![sample("db1", 99.0)]);
    let notifier = RecordingNotifier::failing();
    let t0 = start();
    let mut state = MonitorState::default();

    let outcome = check_health_at(&source, &notifier, &config, &mut state, t0).await;

    assert!(outcome.flushed);
    assert_eq!(outcome.messages_failed, 2);
    assert_eq!(outcome.messages_sent, 0);
    assert!(state.pending_alerts().is_empty());

    let outcome =
        check_health_at(&source, &notifier, &config, &mut state, t0 + Duration::seconds(60)).await;
    assert!(!outcome.flushed);
    assert_eq!(notifier.sent().len(), 2);
}

#[tokio::test]
async fn unmapped_private_instance_is_never_reported() {
    let config = test_config(180);
    let source = MockMetricsSource::new();
    source.respond(
        "cpu_query",
        vec![sample("10.0.0.7:9100", 99.0), sample("web1", 5.0)],
    );
    let notifier = RecordingNotifier::new();
    let mut state = MonitorState::default();

    check_health_at(&source, &notifier, &config, &mut state, start()).await;

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert!(!sent[0].contains("10.0.0.7"));
    assert_eq!(state.tracked_instances(), 1);
    assert!(state.liveness.last_seen("10.0.0.7:9100").is_none());
}

#[tokio::test]
async fn query_failure_degrades_to_down_detection() {
    let config = test_config(100_000);
    let source = MockMetricsSource::new();
    let notifier = RecordingNotifier::new();
    let t0 = start();
    let mut state = MonitorState::flushed_at(t0);

    source.respond("cpu_query", vec![sample("db1", 10.0)]);
    check_health_at(&source, &notifier, &config, &mut state, t0).await;

    source.fail("cpu_query", "connection reset");
    let outcome =
        check_health_at(&source, &notifier, &config, &mut state, t0 + Duration::seconds(121)).await;

    assert_eq!(outcome.instances_down, 1);
    assert_eq!(outcome.instances_up, 0);
}
