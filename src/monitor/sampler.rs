use std::collections::BTreeMap;

use crate::config::Config;

use super::{instance::resolve_instance, provider::MetricsSource};

/// Latest value per metric for every instance that reported this tick.
#[derive(Debug, Default, Clone)]
pub struct TickSamples {
    by_instance: BTreeMap<String, BTreeMap<String, f64>>,
}

impl TickSamples {
    pub(crate) fn record(&mut self, instance: String, metric: &str, value: f64) {
        self.by_instance
            .entry(instance)
            .or_default()
            .insert(metric.to_string(), value);
    }

    pub fn instances(&self) -> impl Iterator<Item = &str> {
        self.by_instance.keys().map(String::as_str)
    }

    pub fn metrics_for(&self, instance: &str) -> Option<&BTreeMap<String, f64>> {
        self.by_instance.get(instance)
    }

    pub fn len(&self) -> usize {
        self.by_instance.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_instance.is_empty()
    }
}

/// Runs one query per configured metric. A failing metric contributes nothing
/// to this tick; the remaining metrics are still collected.
pub async fn collect_tick<S: MetricsSource>(source: &S, config: &Config) -> TickSamples {
    let mut tick = TickSamples::default();

    for (metric, spec) in &config.metrics {
        let results = match source.query(&spec.query).await {
            Ok(results) => results,
            Err(error) => {
                log::warn!("metric_query_failed metric={} error={}", metric, error);
                continue;
            }
        };

        let mut dropped = 0usize;
        for result in results {
            match resolve_instance(&result.labels, &config.instance_names) {
                Some(instance) => tick.record(instance, metric, result.value),
                None => dropped += 1,
            }
        }

        if dropped > 0 {
            log::debug!(
                "metric_series_dropped metric={} reason=unmapped_private_address count={}",
                metric,
                dropped
            );
        }
    }

    tick
}
