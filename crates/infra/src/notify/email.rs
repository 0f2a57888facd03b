//! Email delivery over a JSON HTTP API.

use async_trait::async_trait;
use openhouse_core::{EmailMessage, EmailPort};
use openhouse_domain::{EmailConfig, OpenHouseError, Result};
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

#[derive(Serialize)]
struct OutboundEmail<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

/// Transactional email sender posting to the configured API endpoint.
pub struct HttpEmailSender {
    http: Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl HttpEmailSender {
    pub fn from_config(config: &EmailConfig) -> Result<Self> {
        let api_url = config
            .api_url
            .clone()
            .ok_or_else(|| OpenHouseError::Config("email.api_url not set".into()))?;
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| OpenHouseError::Config("email.api_key not set".into()))?;
        Ok(Self { http: Client::new(), api_url, api_key, from: config.from.clone() })
    }
}

#[async_trait]
impl EmailPort for HttpEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        let body = OutboundEmail {
            from: &self.from,
            to: &message.to,
            subject: &message.subject,
            text: &message.body,
        };

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| OpenHouseError::Network(format!("email send failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(OpenHouseError::Network(format!("email API returned {status}")));
        }
        debug!(to = %message.to, "email dispatched");
        Ok(())
    }
}

/// Used when email delivery is disabled: logs the message and succeeds.
pub struct NoopEmailSender;

#[async_trait]
impl EmailPort for NoopEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        debug!(to = %message.to, subject = %message.subject, "email delivery disabled, dropping");
        Ok(())
    }
}
