use chrono::{DateTime, Utc};

mod flush;
mod liveness;

pub use flush::PendingFlush;
pub use liveness::LivenessTracker;

/// Everything that must survive from one tick to the next.
///
/// Owned by the scheduler loop and handed to each tick by reference; nothing
/// else writes to it.
#[derive(Debug, Default)]
pub struct MonitorState {
    pub(crate) liveness: LivenessTracker,
    pub(crate) alert_buffer: Vec<String>,
    pub(crate) last_flush_at: Option<DateTime<Utc>>,
}

impl MonitorState {
    #[cfg(test)]
    pub(crate) fn flushed_at(at: DateTime<Utc>) -> Self {
        Self {
            last_flush_at: Some(at),
            ..Self::default()
        }
    }

    pub(crate) fn buffer_alerts(&mut self, alerts: impl IntoIterator<Item = String>) {
        self.alert_buffer.extend(alerts);
    }

    pub fn pending_alerts(&self) -> &[String] {
        &self.alert_buffer
    }

    pub fn tracked_instances(&self) -> usize {
        self.liveness.len()
    }
}
