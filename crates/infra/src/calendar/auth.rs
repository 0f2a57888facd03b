//! Refresh-token grant with a cached access token.

use chrono::{DateTime, Duration, Utc};
use openhouse_domain::{CalendarConfig, OpenHouseError, Result};
use parking_lot::Mutex;
use reqwest::Client;
use tracing::debug;

use super::types::TokenResponse;

const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

// Refresh this long before the provider-reported expiry.
const EXPIRY_SKEW_SECS: i64 = 60;

#[derive(Debug)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

/// Exchanges the configured refresh token for access tokens, caching them
/// until shortly before expiry.
#[derive(Debug)]
pub struct TokenManager {
    http: Client,
    client_id: String,
    client_secret: String,
    refresh_token: String,
    token_url: String,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenManager {
    pub fn from_config(config: &CalendarConfig, http: Client) -> Result<Self> {
        let client_id = config
            .client_id
            .clone()
            .ok_or_else(|| OpenHouseError::Config("calendar.client_id not set".into()))?;
        let client_secret = config
            .client_secret
            .clone()
            .ok_or_else(|| OpenHouseError::Config("calendar.client_secret not set".into()))?;
        let refresh_token = config
            .refresh_token
            .clone()
            .ok_or_else(|| OpenHouseError::Config("calendar.refresh_token not set".into()))?;
        let token_url =
            config.token_url.clone().unwrap_or_else(|| GOOGLE_TOKEN_URL.to_string());

        Ok(Self {
            http,
            client_id,
            client_secret,
            refresh_token,
            token_url,
            cached: Mutex::new(None),
        })
    }

    /// A valid access token, refreshed through the token endpoint when the
    /// cached one is missing or about to expire.
    pub async fn access_token(&self) -> Result<String> {
        {
            let cached = self.cached.lock();
            if let Some(token) = cached.as_ref() {
                if token.expires_at > Utc::now() {
                    return Ok(token.access_token.clone());
                }
            }
        }

        let refreshed = self.refresh().await?;
        let access_token = refreshed.access_token.clone();
        *self.cached.lock() = Some(refreshed);
        Ok(access_token)
    }

    async fn refresh(&self) -> Result<CachedToken> {
        debug!("refreshing calendar access token");

        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", self.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|err| {
                OpenHouseError::ProviderUnavailable(format!("token refresh request failed: {err}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(OpenHouseError::ProviderUnavailable(format!(
                "token refresh failed ({status}): {detail}"
            )));
        }

        let token: TokenResponse = response.json().await.map_err(|err| {
            OpenHouseError::ProviderUnavailable(format!("failed to parse token response: {err}"))
        })?;

        Ok(CachedToken {
            access_token: token.access_token,
            expires_at: Utc::now()
                + Duration::seconds((token.expires_in - EXPIRY_SKEW_SECS).max(0)),
        })
    }
}
