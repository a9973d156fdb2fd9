use std::{
    collections::{BTreeMap, HashMap},
    time::Duration,
};

use serde::Deserialize;

use super::defaults::*;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub prometheus_url: String,
    #[serde(alias = "discord_webhook")]
    pub webhook_url: String,
    #[serde(default = "default_poll_interval", alias = "check_interval")]
    pub poll_interval: u64,
    #[serde(default = "default_summary_interval")]
    pub summary_interval: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub metrics: BTreeMap<String, MetricSpec>,
    #[serde(default)]
    pub instance_names: HashMap<String, String>,
}

/// One named signal: the query that produces it plus how it is displayed.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricSpec {
    pub query: String,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub unit: String,
    #[serde(default, alias = "emoji")]
    pub emblem: String,
}

impl Config {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Instances not seen for longer than this are declared DOWN.
    pub fn liveness_window(&self) -> chrono::Duration {
        seconds_delta(self.poll_interval.saturating_mul(2))
    }

    pub fn summary_window(&self) -> chrono::Duration {
        seconds_delta(self.summary_interval)
    }
}

// Intervals are bounded by `validate`; saturate rather than panic if that is bypassed.
fn seconds_delta(secs: u64) -> chrono::Duration {
    i64::try_from(secs)
        .ok()
        .and_then(chrono::Duration::try_seconds)
        .unwrap_or(chrono::Duration::MAX)
}
