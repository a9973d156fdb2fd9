use thiserror::Error;

use super::schema::Config;

const MAX_INTERVAL_SECS: u64 = 365 * 24 * 3600;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Validation(String),
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_endpoint("prometheus_url", &self.prometheus_url)?;
        validate_endpoint("webhook_url", &self.webhook_url)?;

        validate_interval("poll_interval", self.poll_interval)?;
        validate_interval("summary_interval", self.summary_interval)?;
        validate_interval("request_timeout_secs", self.request_timeout_secs)?;

        for (name, spec) in &self.metrics {
            if name.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "metric names must not be empty".to_string(),
                ));
            }
            if spec.query.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "metrics.{}.query must not be empty",
                    name
                )));
            }
            if let Some(max) = spec.max
                && !max.is_finite()
            {
                return Err(ConfigError::Validation(format!(
                    "metrics.{}.max must be a finite number",
                    name
                )));
            }
        }

        if let Some((raw, _)) = self
            .instance_names
            .iter()
            .find(|(_, friendly)| friendly.trim().is_empty())
        {
            return Err(ConfigError::Validation(format!(
                "instance_names.{} must not map to an empty name",
                raw
            )));
        }

        Ok(())
    }
}

fn validate_interval(field: &str, secs: u64) -> Result<(), ConfigError> {
    if secs == 0 {
        return Err(ConfigError::Validation(format!(
            "{} must be greater than 0",
            field
        )));
    }
    if secs > MAX_INTERVAL_SECS {
        return Err(ConfigError::Validation(format!(
            "{} must be at most {} seconds",
            field, MAX_INTERVAL_SECS
        )));
    }
    Ok(())
}

fn validate_endpoint(field: &str, value: &str) -> Result<(), ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{} must not be empty", field)));
    }
    if !(value.starts_with("http://") || value.starts_with("https://")) {
        return Err(ConfigError::Validation(format!(
            "{} must be an http:// or https:// URL",
            field
        )));
    }
    Ok(())
}
