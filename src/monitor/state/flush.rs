use chrono::{DateTime, Duration, Utc};

use super::MonitorState;

/// Summary plus every alert buffered since the previous flush, in generation order.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingFlush {
    pub summary: String,
    pub alerts: Vec<String>,
}

impl MonitorState {
    pub(crate) fn flush_due(&self, now: DateTime<Utc>, interval: Duration) -> bool {
        match self.last_flush_at {
            Some(last) => now.signed_duration_since(last) >= interval,
            None => true,
        }
    }

    /// Drains the alert buffer and restarts the flush timer at `now`.
    ///
    /// Both happen before anything is sent, so a failed delivery never
    /// re-queues alerts.
    pub(crate) fn take_flush(&mut self, summary: String, now: DateTime<Utc>) -> PendingFlush {
        self.last_flush_at = Some(now);
        PendingFlush {
            summary,
            alerts: std::mem::take(&mut self.alert_buffer),
        }
    }
}
