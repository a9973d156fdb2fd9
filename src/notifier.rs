use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

const DISCORD_CONTENT_LIMIT: usize = 2000;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("webhook rejected message with status {0}")]
    Rejected(u16),
}

pub trait Notifier {
    async fn send(&self, message: &str) -> Result<(), NotifyError>;
}

/// Sends `message`, logging instead of propagating any failure.
pub async fn deliver<N: Notifier>(notifier: &N, message: &str) -> bool {
    match notifier.send(message).await {
        Ok(()) => true,
        Err(error) => {
            log::error!("notification_send_failed error={}", error);
            false
        }
    }
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
}

/// Posts plain-text messages to a Discord webhook.
#[derive(Debug, Clone)]
pub struct DiscordNotifier {
    client: reqwest::Client,
    webhook_url: String,
}

impl DiscordNotifier {
    pub fn new(webhook_url: &str, timeout: Duration) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, webhook_url))
    }

    pub fn with_client(client: reqwest::Client, webhook_url: &str) -> Self {
        Self {
            client,
            webhook_url: webhook_url.to_string(),
        }
    }
}

impl Notifier for DiscordNotifier {
    /// Long messages go out as several posts; the first rejected part aborts the rest.
    async fn send(&self, message: &str) -> Result<(), NotifyError> {
        let parts = split_content(message);
        if parts.len() > 1 {
            log::info!(
                "notification_split chars={} parts={} limit={}",
                message.chars().count(),
                parts.len(),
                DISCORD_CONTENT_LIMIT
            );
        }

        for content in &parts {
            let response = self
                .client
                .post(&self.webhook_url)
                .json(&WebhookPayload { content })
                .send()
                .await?;
            let status = response.status();
            if !status.is_success() {
                return Err(NotifyError::Rejected(status.as_u16()));
            }
        }
        Ok(())
    }
}

/// Splits `message` into webhook-sized parts, breaking between lines.
/// A single line longer than the limit is cut by characters.
fn split_content(message: &str) -> Vec<String> {
    if message.chars().count() <= DISCORD_CONTENT_LIMIT {
        return vec![message.to_string()];
    }

    let mut parts = Vec::new();
    let mut lines: Vec<&str> = Vec::new();
    let mut used = 0usize;

    for line in message.split('\n') {
        let len = line.chars().count();
        if len > DISCORD_CONTENT_LIMIT {
            if !lines.is_empty() {
                parts.push(lines.join("\n"));
                lines.clear();
            }
            let chars: Vec<char> = line.chars().collect();
            parts.extend(
                chars
                    .chunks(DISCORD_CONTENT_LIMIT)
                    .map(|chunk| chunk.iter().collect::<String>()),
            );
            continue;
        }

        if !lines.is_empty() && used + 1 + len > DISCORD_CONTENT_LIMIT {
            parts.push(lines.join("\n"));
            lines.clear();
        }
        used = if lines.is_empty() { len } else { used + 1 + len };
        lines.push(line);
    }

    if !lines.is_empty() {
        parts.push(lines.join("\n"));
    }
    parts
}

/// Records every message; optionally fails every send after recording it.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingNotifier {
    sent: std::sync::Mutex<Vec<String>>,
    failing: bool,
}

#[cfg(test)]
impl RecordingNotifier {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub(crate) fn sent(&self) -> Vec<String> {
        self.sent.lock().expect("recorder lock").clone()
    }
}

#[cfg(test)]
impl Notifier for RecordingNotifier {
    async fn send(&self, message: &str) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .expect("recorder lock")
            .push(message.to_string());
        if self.failing {
            return Err(NotifyError::Rejected(500));
        }
        Ok(())
    }
}
