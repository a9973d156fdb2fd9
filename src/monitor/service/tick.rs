use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::notifier::{Notifier, deliver};

use crate::monitor::{
    evaluator::evaluate_tick,
    format::clock_stamp,
    provider::MetricsSource,
    sampler::{TickSamples, collect_tick},
    state::{MonitorState, PendingFlush},
};

/// Counters describing one completed tick, for logging and tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutcome {
    pub instances_up: usize,
    pub instances_down: usize,
    pub alerts_generated: usize,
    pub flushed: bool,
    pub messages_sent: usize,
    pub messages_failed: usize,
}

/// Runs one poll → evaluate → maybe-flush cycle against the live clock.
pub async fn check_health<S: MetricsSource, N: Notifier>(
    source: &S,
    notifier: &N,
    config: &Config,
    state: &mut MonitorState,
) -> TickOutcome {
    let tick = collect_tick(source, config).await;
    process_tick(notifier, config, state, &tick, Utc::now()).await
}

/// Same as [`check_health`] with an explicit evaluation time.
#[cfg(test)]
pub(super) async fn check_health_at<S: MetricsSource, N: Notifier>(
    source: &S,
    notifier: &N,
    config: &Config,
    state: &mut MonitorState,
    now: DateTime<Utc>,
) -> TickOutcome {
    let tick = collect_tick(source, config).await;
    process_tick(notifier, config, state, &tick, now).await
}

async fn process_tick<N: Notifier>(
    notifier: &N,
    config: &Config,
    state: &mut MonitorState,
    tick: &TickSamples,
    now: DateTime<Utc>,
) -> TickOutcome {
    if tick.is_empty() && !config.metrics.is_empty() {
        log::warn!("monitor_tick_empty metrics={}", config.metrics.len());
    }

    let down = state
        .liveness
        .observe(tick.instances(), now, config.liveness_window());
    for instance in &down {
        log::warn!(
            "instance_down instance={} window_secs={}",
            instance,
            config.liveness_window().num_seconds()
        );
    }

    let report = evaluate_tick(config, tick, &down, &clock_stamp(now));
    let mut outcome = TickOutcome {
        instances_up: report.up,
        instances_down: report.down,
        alerts_generated: report.alerts.len(),
        ..TickOutcome::default()
    };
    state.buffer_alerts(report.alerts);

    if state.flush_due(now, config.summary_window()) {
        let flush = state.take_flush(report.summary, now);
        outcome.flushed = true;
        send_flush(notifier, &flush, &mut outcome).await;
    }

    tracing::info!(
        target: "monitor",
        module = "monitor",
        instances_reported = tick.len(),
        instances_up = outcome.instances_up,
        instances_down = outcome.instances_down,
        tracked = state.tracked_instances(),
        alerts_generated = outcome.alerts_generated,
        alerts_pending = state.pending_alerts().len(),
        flushed = outcome.flushed,
        messages_sent = outcome.messages_sent,
        messages_failed = outcome.messages_failed,
        "monitor_tick"
    );

    outcome
}

async fn send_flush<N: Notifier>(notifier: &N, flush: &PendingFlush, outcome: &mut TickOutcome) {
    for message in std::iter::once(&flush.summary).chain(flush.alerts.iter()) {
        if deliver(notifier, message).await {
            outcome.messages_sent += 1;
        } else {
            outcome.messages_failed += 1;
        }
    }
}
