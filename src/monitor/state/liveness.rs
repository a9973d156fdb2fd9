use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

/// Last-seen timestamps for instances currently considered UP.
#[derive(Debug, Default)]
pub struct LivenessTracker {
    last_seen: HashMap<String, DateTime<Utc>>,
}

impl LivenessTracker {
    /// Marks every instance in `seen` as alive at `now`, then drops and returns
    /// (sorted) every tracked instance silent for longer than `window`.
    pub fn observe<'a>(
        &mut self,
        seen: impl IntoIterator<Item = &'a str>,
        now: DateTime<Utc>,
        window: Duration,
    ) -> Vec<String> {
        for instance in seen {
            self.last_seen.insert(instance.to_string(), now);
        }

        let mut down: Vec<String> = self
            .last_seen
            .iter()
            .filter(|(_, last)| now.signed_duration_since(**last) > window)
            .map(|(instance, _)| instance.clone())
            .collect();
        down.sort();

        for instance in &down {
            self.last_seen.remove(instance);
        }

        down
    }

    #[cfg(test)]
    pub fn last_seen(&self, instance: &str) -> Option<DateTime<Utc>> {
        self.last_seen.get(instance).copied()
    }

    #[cfg(test)]
    pub fn is_up(&self, instance: &str) -> bool {
        self.last_seen.contains_key(instance)
    }

    pub fn len(&self) -> usize {
        self.last_seen.len()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::LivenessTracker;

    #[test]
    fn seen_instances_stay_up() {
        let mut tracker = LivenessTracker::default();
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let window = Duration::seconds(120);

        assert!(tracker.observe(["db1"], start, window).is_empty());
        let later = start + Duration::seconds(600);
        assert!(tracker.observe(["db1"], later, window).is_empty());
        assert_eq!(tracker.last_seen("db1"), Some(later));
    }

    #[test]
    fn silent_instance_goes_down_once_after_window() {
        let mut tracker = LivenessTracker::default();
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let window = Duration::seconds(120);

        tracker.observe(["db1", "web1"], start, window);

        let at_boundary = start + Duration::seconds(120);
        assert!(tracker.observe(["web1"], at_boundary, window).is_empty());
        assert!(tracker.is_up("db1"));

        let past_window = start + Duration::seconds(180);
        let down = tracker.observe(["web1"], past_window, window);
        assert_eq!(down, vec!["db1".to_string()]);
        assert!(!tracker.is_up("db1"));

        let next = start + Duration::seconds(240);
        assert!(tracker.observe(["web1"], next, window).is_empty());
    }

    #[test]
    fn reappearing_instance_is_fresh() {
        let mut tracker = LivenessTracker::default();
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let window = Duration::seconds(120);

        tracker.observe(["db1"], start, window);
        tracker.observe(std::iter::empty(), start + Duration::seconds(200), window);
        assert_eq!(tracker.len(), 0);

        let back = start + Duration::seconds(260);
        assert!(tracker.observe(["db1"], back, window).is_empty());
        assert_eq!(tracker.last_seen("db1"), Some(back));
    }
}
