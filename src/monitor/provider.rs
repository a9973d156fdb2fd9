use std::{collections::HashMap, time::Duration};

use serde::Deserialize;
use thiserror::Error;

/// One series returned by an instant query.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySample {
    pub labels: HashMap<String, String>,
    pub value: f64,
}

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("metrics source request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("metrics source responded with HTTP {0}")]
    Http(u16),
    #[error("metrics source returned status {status}: {message}")]
    Status { status: String, message: String },
    #[error("metrics source returned a non-numeric sample value {0:?}")]
    InvalidValue(String),
}

pub trait MetricsSource {
    async fn query(&self, expression: &str) -> Result<Vec<QuerySample>, MonitorError>;
}

/// Prometheus instant-query client (`/api/v1/query`).
#[derive(Debug, Clone)]
pub struct PrometheusSource {
    client: reqwest::Client,
    query_url: String,
}

impl PrometheusSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, MonitorError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            query_url: format!("{}/api/v1/query", base_url.trim_end_matches('/')),
        }
    }
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    status: String,
    #[serde(default)]
    data: Option<QueryData>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QueryData {
    #[serde(default)]
    result: Vec<RawSeries>,
}

#[derive(Debug, Deserialize)]
struct RawSeries {
    #[serde(default)]
    metric: HashMap<String, String>,
    value: (serde_json::Value, String),
}

impl MetricsSource for PrometheusSource {
    async fn query(&self, expression: &str) -> Result<Vec<QuerySample>, MonitorError> {
        let response = self
            .client
            .get(&self.query_url)
            .query(&[("query", expression)])
            .send()
            .await?;

        let http_status = response.status();
        if !http_status.is_success() {
            // Prometheus reports query errors as 4xx/5xx with a JSON body; proxies do not.
            let body = response.text().await?;
            return Err(match serde_json::from_str::<QueryResponse>(&body) {
                Ok(parsed) if parsed.status != "success" => MonitorError::Status {
                    status: parsed.status,
                    message: parsed.error.unwrap_or_default(),
                },
                _ => MonitorError::Http(http_status.as_u16()),
            });
        }

        let response: QueryResponse = response.json().await?;

        if response.status != "success" {
            return Err(MonitorError::Status {
                status: response.status,
                message: response.error.unwrap_or_default(),
            });
        }

        let series = response.data.map(|data| data.result).unwrap_or_default();
        series
            .into_iter()
            .map(|series| {
                let (_, raw_value) = series.value;
                let value = raw_value
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| MonitorError::InvalidValue(raw_value.clone()))?;
                Ok(QuerySample {
                    labels: series.metric,
                    value,
                })
            })
            .collect()
    }
}

/// Scripted source keyed by query expression. Unknown expressions return an empty set.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct MockMetricsSource {
    responses: std::sync::Mutex<HashMap<String, Result<Vec<QuerySample>, String>>>,
}

#[cfg(test)]
impl MockMetricsSource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(&self, expression: &str, samples: Vec<QuerySample>) {
        self.responses
            .lock()
            .expect("mock lock")
            .insert(expression.to_string(), Ok(samples));
    }

    pub(crate) fn fail(&self, expression: &str, message: &str) {
        self.responses
            .lock()
            .expect("mock lock")
            .insert(expression.to_string(), Err(message.to_string()));
    }

    pub(crate) fn clear(&self) {
        self.responses.lock().expect("mock lock").clear();
    }
}

#[cfg(test)]
impl MetricsSource for MockMetricsSource {
    async fn query(&self, expression: &str) -> Result<Vec<QuerySample>, MonitorError> {
        match self.responses.lock().expect("mock lock").get(expression) {
            Some(Ok(samples)) => Ok(samples.clone()),
            Some(Err(message)) => Err(MonitorError::Status {
                status: "error".to_string(),
                message: message.clone(),
            }),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
pub(crate) fn sample(instance: &str, value: f64) -> QuerySample {
    QuerySample {
        labels: HashMap::from([("instance".to_string(), instance.to_string())]),
        value,
    }
}
