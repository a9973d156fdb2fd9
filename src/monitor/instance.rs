use std::{collections::HashMap, net::Ipv4Addr};

const EXPORTED_INSTANCE_LABEL: &str = "exported_instance";
const INSTANCE_LABEL: &str = "instance";
const UNKNOWN_INSTANCE: &str = "unknown";

pub(crate) fn raw_instance_id(labels: &HashMap<String, String>) -> &str {
    [EXPORTED_INSTANCE_LABEL, INSTANCE_LABEL]
        .iter()
        .filter_map(|label| labels.get(*label))
        .map(String::as_str)
        .find(|value| !value.is_empty())
        .unwrap_or(UNKNOWN_INSTANCE)
}

/// Maps a series' labels to the display name it is tracked under.
///
/// Returns `None` for unmapped private-network addresses: those series are
/// scrape noise and must never become a tracked instance.
pub(crate) fn resolve_instance(
    labels: &HashMap<String, String>,
    instance_names: &HashMap<String, String>,
) -> Option<String> {
    let raw = raw_instance_id(labels);
    if let Some(friendly) = instance_names.get(raw) {
        return Some(friendly.clone());
    }
    if is_private_address(raw) {
        return None;
    }
    Some(raw.to_string())
}

pub(crate) fn is_private_address(raw: &str) -> bool {
    let host = raw.rsplit_once(':').map_or(raw, |(host, _port)| host);
    host.parse::<Ipv4Addr>()
        .map(|address| address.is_private())
        .unwrap_or(false)
}
