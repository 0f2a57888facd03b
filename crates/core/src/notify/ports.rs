//! Notification port interfaces

use async_trait::async_trait;
use openhouse_domain::Result;
use serde::{Deserialize, Serialize};

/// A plain-text email to one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Trait for delivering email
#[async_trait]
pub trait EmailPort: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<()>;
}

/// Trait for delivering SMS
#[async_trait]
pub trait SmsPort: Send + Sync {
    async fn send(&self, to: &str, body: &str) -> Result<()>;
}

/// Event pushed to connected admin/agent clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeEvent {
    pub event: String,
    pub payload: serde_json::Value,
}

/// Trait for realtime push. Publishing is synchronous and non-blocking:
/// implementations drop events for channels nobody is subscribed to.
pub trait RealtimePort: Send + Sync {
    fn publish(&self, channel: &str, event: RealtimeEvent);
}
