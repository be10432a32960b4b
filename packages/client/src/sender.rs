//! Send action: posts chat messages to the relay's ingress endpoint.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::{config::ClientConfig, error::ClientError};

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    message: &'a str,
    timestamp: String,
}

#[derive(Debug, Deserialize)]
struct StatusBody {
    status: String,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Accepted by the relay
    Sent,
    /// Blank input; no request was made
    Skipped,
}

pub struct MessageSender {
    http: reqwest::Client,
    endpoint: String,
}

impl MessageSender {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: config.send_url(),
        }
    }

    /// Trim `input` and post it. Blank input is skipped.
    pub async fn send(&self, input: &str) -> Result<SendOutcome, ClientError> {
        let message = input.trim();
        if message.is_empty() {
            return Ok(SendOutcome::Skipped);
        }

        let request = SendRequest {
            message,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        let response = self.http.post(&self.endpoint).json(&request).send().await?;
        let status = response.status();
        let body: StatusBody = response.json().await?;

        if !status.is_success() {
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                reason: body.error.unwrap_or(body.status),
            });
        }

        tracing::debug!("Server confirmation: {}", body.status);
        Ok(SendOutcome::Sent)
    }
}
