use thiserror::Error;

use crate::{
    config::Config,
    monitor::{MonitorError, PrometheusSource},
    notifier::{DiscordNotifier, NotifyError},
};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to build metrics source client: {0}")]
    Source(#[from] MonitorError),
    #[error("failed to build notifier client: {0}")]
    Notifier(#[from] NotifyError),
}

/// Immutable collaborators shared by every tick.
pub struct AppContext {
    pub config: Config,
    pub source: PrometheusSource,
    pub notifier: DiscordNotifier,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self, StartupError> {
        let timeout = config.request_timeout();
        let source = PrometheusSource::new(&config.prometheus_url, timeout)?;
        let notifier = DiscordNotifier::new(&config.webhook_url, timeout)?;
        Ok(Self {
            config,
            source,
            notifier,
        })
    }
}
