mod evaluator;
mod format;
mod instance;
mod provider;
mod sampler;
mod service;
mod state;

pub use provider::{MonitorError, PrometheusSource};
pub use service::check_health;
pub use state::MonitorState;
