//! In-process realtime push: an explicit registry of per-channel broadcast
//! senders. Constructed once and injected; there is no module-level global.

use dashmap::DashMap;
use openhouse_core::{RealtimeEvent, RealtimePort};
use tokio::sync::broadcast;
use tracing::trace;

const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Connection registry for realtime push channels.
pub struct BroadcastHub {
    channels: DashMap<String, broadcast::Sender<RealtimeEvent>>,
    capacity: usize,
}

impl BroadcastHub {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { channels: DashMap::new(), capacity: capacity.max(1) }
    }

    /// Subscribe to a channel, creating it on first use.
    pub fn subscribe(&self, channel: &str) -> broadcast::Receiver<RealtimeEvent> {
        self.channels
            .entry(channel.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new()
    }
}

impl RealtimePort for BroadcastHub {
    fn publish(&self, channel: &str, event: RealtimeEvent) {
        match self.channels.get(channel) {
            // A send error just means every subscriber is gone; the event is
            // best-effort either way.
            Some(sender) => {
                let _ = sender.send(event);
            }
            None => trace!(channel, "no subscribers, dropping realtime event"),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let hub = BroadcastHub::new();
        let mut receiver = hub.subscribe("admin");

        hub.publish("admin", RealtimeEvent { event: "ping".into(), payload: json!({}) });

        let event = receiver.recv().await.expect("event delivered");
        assert_eq!(event.event, "ping");
    }

    #[tokio::test]
    async fn publishing_without_subscribers_is_a_no_op() {
        let hub = BroadcastHub::new();
        hub.publish("nobody", RealtimeEvent { event: "ping".into(), payload: json!({}) });
    }

    #[tokio::test]
    async fn channels_are_isolated() {
        let hub = BroadcastHub::new();
        let mut admin = hub.subscribe("admin");
        let mut agent = hub.subscribe("agent:1");

        hub.publish("agent:1", RealtimeEvent { event: "booked".into(), payload: json!({}) });

        assert_eq!(agent.recv().await.expect("delivered").event, "booked");
        assert!(admin.try_recv().is_err());
    }
}
