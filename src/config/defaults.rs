pub(super) fn default_poll_interval() -> u64 {
    60
}

pub(super) fn default_summary_interval() -> u64 {
    180
}

pub(super) fn default_request_timeout_secs() -> u64 {
    10
}
