use chrono::{DateTime, Local, Utc};

use crate::config::MetricSpec;

pub(crate) const SUMMARY_HEADER: &str = "🩺 **Server Health Summary**";
const FRAGMENT_SEPARATOR: &str = " | ";

/// Local wall-clock time rendered for humans, e.g. `03:07 PM`.
pub(crate) fn clock_stamp(now: DateTime<Utc>) -> String {
    now.with_timezone(&Local).format("%I:%M %p").to_string()
}

pub(crate) fn timestamp_line(stamp: &str) -> String {
    format!("🕒 Today at {}", stamp)
}

pub(crate) fn metric_fragment(name: &str, spec: &MetricSpec, value: f64) -> String {
    format!("{}{}: {:.2}{}", spec.emblem, name, value, spec.unit)
}

pub(crate) fn join_fragments(fragments: &[String]) -> String {
    fragments.join(FRAGMENT_SEPARATOR)
}

pub(crate) fn down_entry(instance: &str) -> String {
    format!("{} — 🔴 DOWN", instance)
}

pub(crate) fn up_entry(instance: &str, fragments: &[String]) -> String {
    if fragments.is_empty() {
        return format!("{} — 🟢 UP", instance);
    }
    format!("{} — 🟢 UP\n{}", instance, join_fragments(fragments))
}

pub(crate) fn down_alert(instance: &str, stamp: &str) -> String {
    format!(
        "🚨 **ALERT:** {} is **DOWN** ❌\n{}",
        instance,
        timestamp_line(stamp)
    )
}

pub(crate) fn threshold_alert(
    instance: &str,
    name: &str,
    spec: &MetricSpec,
    value: f64,
    max: f64,
    fragments: &[String],
    stamp: &str,
) -> String {
    format!(
        "⚠️ Alert: {instance}\n⚠️ {name} {value:.2}{unit} > {max}{unit}\n\nCurrent Stats\n{stats}\n{time}",
        unit = spec.unit,
        stats = join_fragments(fragments),
        time = timestamp_line(stamp),
    )
}
