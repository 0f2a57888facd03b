//! SMS delivery over a form-POST HTTP API with basic auth.

use async_trait::async_trait;
use openhouse_core::SmsPort;
use openhouse_domain::{OpenHouseError, Result, SmsConfig};
use reqwest::Client;
use tracing::debug;

/// SMS sender posting to the configured messaging API.
pub struct HttpSmsSender {
    http: Client,
    api_url: String,
    account_sid: String,
    auth_token: String,
    from: String,
}

impl HttpSmsSender {
    pub fn from_config(config: &SmsConfig) -> Result<Self> {
        let api_url = config
            .api_url
            .clone()
            .ok_or_else(|| OpenHouseError::Config("sms.api_url not set".into()))?;
        let account_sid = config
            .account_sid
            .clone()
            .ok_or_else(|| OpenHouseError::Config("sms.account_sid not set".into()))?;
        let auth_token = config
            .auth_token
            .clone()
            .ok_or_else(|| OpenHouseError::Config("sms.auth_token not set".into()))?;
        let from = config
            .from
            .clone()
            .ok_or_else(|| OpenHouseError::Config("sms.from not set".into()))?;
        Ok(Self { http: Client::new(), api_url, account_sid, auth_token, from })
    }
}

#[async_trait]
impl SmsPort for HttpSmsSender {
    async fn send(&self, to: &str, body: &str) -> Result<()> {
        let response = self
            .http
            .post(&self.api_url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[("From", self.from.as_str()), ("To", to), ("Body", body)])
            .send()
            .await
            .map_err(|err| OpenHouseError::Network(format!("sms send failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(OpenHouseError::Network(format!("sms API returned {status}")));
        }
        debug!(to, "sms dispatched");
        Ok(())
    }
}

/// Used when SMS delivery is disabled: logs and succeeds.
pub struct NoopSmsSender;

#[async_trait]
impl SmsPort for NoopSmsSender {
    async fn send(&self, to: &str, _body: &str) -> Result<()> {
        debug!(to, "sms delivery disabled, dropping");
        Ok(())
    }
}
