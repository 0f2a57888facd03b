//! Application configuration structures
//!
//! Loaded by the infra config loader from environment variables or a
//! JSON/TOML file. Every field has a serde default so partial files work.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_LOOKAHEAD_DAYS;

/// Top-level configuration for the application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub booking: BookingConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub sms: SmsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: "openhouse.db".into(), pool_size: 8 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// `"development"` or `"production"`. Production responses omit
    /// internal error detail.
    pub environment: String,
}

impl ServerConfig {
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, environment: "development".into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingConfig {
    /// How many days ahead the next-open-slot search scans.
    pub lookahead_days: u32,
    /// Cap on free slots returned per agent per day by the availability
    /// query.
    pub max_slots_per_day: usize,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self { lookahead_days: DEFAULT_LOOKAHEAD_DAYS, max_slots_per_day: 10 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    pub enabled: bool,
    /// When the provider errors, treat the queried window as free (`true`,
    /// the default) or as busy (`false`). Fail-open keeps bookings flowing
    /// through provider outages at the cost of possible double-booking.
    pub fail_open: bool,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub refresh_token: Option<String>,
    /// Override of the calendar API base URL (integration tests point this
    /// at a local mock server).
    pub api_base: Option<String>,
    /// Override of the OAuth token endpoint.
    pub token_url: Option<String>,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            fail_open: true,
            client_id: None,
            client_secret: None,
            refresh_token: None,
            api_base: None,
            token_url: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    pub enabled: bool,
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub from: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self { enabled: false, api_url: None, api_key: None, from: "bookings@openhouse.example".into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmsConfig {
    pub enabled: bool,
    pub api_url: Option<String>,
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
    pub from: Option<String>,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self { enabled: false, api_url: None, account_sid: None, auth_token: None, from: None }
    }
}
