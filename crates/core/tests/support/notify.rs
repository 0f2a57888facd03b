//! Recording mocks for the notification ports.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use openhouse_core::{EmailMessage, EmailPort, RealtimeEvent, RealtimePort, SmsPort};
use openhouse_domain::Result;

#[derive(Default)]
pub struct RecordingEmail {
    pub sent: Mutex<Vec<EmailMessage>>,
}

#[async_trait]
impl EmailPort for RecordingEmail {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingSms {
    pub sent: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl SmsPort for RecordingSms {
    async fn send(&self, to: &str, body: &str) -> Result<()> {
        self.sent.lock().unwrap().push((to.to_string(), body.to_string()));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingRealtime {
    pub events: Mutex<Vec<(String, RealtimeEvent)>>,
}

impl RealtimePort for RecordingRealtime {
    fn publish(&self, channel: &str, event: RealtimeEvent) {
        self.events.lock().unwrap().push((channel.to_string(), event));
    }
}

/// The three recording channels behind one fan-out instance.
#[derive(Default, Clone)]
pub struct RecordingChannels {
    pub email: Arc<RecordingEmail>,
    pub sms: Arc<RecordingSms>,
    pub realtime: Arc<RecordingRealtime>,
}
