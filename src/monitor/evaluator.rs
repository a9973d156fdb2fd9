use std::collections::BTreeSet;

use crate::config::Config;

use super::{format, sampler::TickSamples};

/// What one tick produced: the summary that would be sent at a flush, and
/// the alerts to append to the buffer.
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub summary: String,
    pub alerts: Vec<String>,
    pub up: usize,
    pub down: usize,
}

/// Builds the summary and alert messages for one tick.
///
/// `down` holds instances the liveness tracker expired this tick. Instances
/// are reported in lexicographic order.
pub(super) fn evaluate_tick(
    config: &Config,
    tick: &TickSamples,
    down: &[String],
    stamp: &str,
) -> TickReport {
    let mut report = TickReport::default();
    let mut lines = vec![format::SUMMARY_HEADER.to_string()];

    let candidates: BTreeSet<&str> = tick
        .instances()
        .chain(down.iter().map(String::as_str))
        .collect();

    for instance in candidates {
        if down.iter().any(|name| name == instance) {
            lines.push(format::down_entry(instance));
            report.alerts.push(format::down_alert(instance, stamp));
            report.down += 1;
            continue;
        }

        let sampled = tick.metrics_for(instance);
        // Missing metrics render as 0 but are never checked against thresholds.
        let fragments: Vec<String> = config
            .metrics
            .iter()
            .map(|(name, spec)| {
                let value = sampled.and_then(|metrics| metrics.get(name)).copied();
                format::metric_fragment(name, spec, value.unwrap_or(0.0))
            })
            .collect();

        lines.push(format::up_entry(instance, &fragments));
        report.up += 1;

        let Some(sampled) = sampled else {
            continue;
        };
        for (name, spec) in &config.metrics {
            let (Some(value), Some(max)) = (sampled.get(name).copied(), spec.max) else {
                continue;
            };
            if value > max {
                report.alerts.push(format::threshold_alert(
                    instance, name, spec, value, max, &fragments, stamp,
                ));
            }
        }
    }

    lines.push(format::timestamp_line(stamp));
    report.summary = lines.join("\n");
    report
}
