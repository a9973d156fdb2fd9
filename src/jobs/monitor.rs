use chrono::Utc;
use tokio::time::sleep;

use crate::app_context::AppContext;
use crate::monitor::{MonitorState, check_health};

/// Drives the monitor forever: poll, evaluate, maybe flush, sleep.
///
/// All cross-tick state lives in this task; nothing here returns an error.
pub async fn run_monitor_job(app_context: &AppContext) {
    let config = &app_context.config;
    let mut state = MonitorState::default();
    let mut previous_tick = None;

    log::info!(
        "monitor_job_started poll_interval={} summary_interval={} metrics={}",
        config.poll_interval,
        config.summary_interval,
        config.metrics.len()
    );

    loop {
        let now = Utc::now();
        if let Some(previous) = previous_tick {
            let elapsed_secs = now.signed_duration_since(previous).num_seconds().max(0);
            let threshold_secs = config.liveness_window().num_seconds();
            if elapsed_secs > threshold_secs {
                log::warn!(
                    "monitor_loop_delayed elapsed_secs={} threshold_secs={}",
                    elapsed_secs,
                    threshold_secs
                );
            }
        }
        previous_tick = Some(now);

        let outcome = check_health(
            &app_context.source,
            &app_context.notifier,
            config,
            &mut state,
        )
        .await;
        if outcome.flushed {
            log::info!(
                "summary_flushed sent={} failed={}",
                outcome.messages_sent,
                outcome.messages_failed
            );
        }

        sleep(config.poll_interval()).await;
    }
}
