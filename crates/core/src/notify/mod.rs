//! Notification fan-out
//!
//! Everything in here is best-effort: a failed email, SMS, or realtime
//! publish is logged and swallowed. By the time fan-out runs the booking is
//! already committed, and no third-party hiccup may unwind it.

pub mod ports;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use openhouse_domain::{AgentContact, Lead, Meeting, PropertySummary};
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

use ports::{EmailMessage, EmailPort, RealtimeEvent, RealtimePort, SmsPort};

use openhouse_domain::constants::ADMIN_CHANNEL;

/// Fan-out dispatcher over the notification ports.
pub struct NotificationFanout {
    email: Arc<dyn EmailPort>,
    sms: Arc<dyn SmsPort>,
    realtime: Arc<dyn RealtimePort>,
}

impl NotificationFanout {
    pub fn new(
        email: Arc<dyn EmailPort>,
        sms: Arc<dyn SmsPort>,
        realtime: Arc<dyn RealtimePort>,
    ) -> Self {
        Self { email, sms, realtime }
    }

    /// Confirmations for a fully booked viewing: email to the lead, email to
    /// the agent, SMS when the lead left a phone number, realtime events to
    /// the admin channel and the agent's channel.
    pub async fn booking_confirmed(
        &self,
        lead: &Lead,
        meeting: &Meeting,
        agent: &AgentContact,
        property: &PropertySummary,
        lead_timezone: Option<&str>,
    ) {
        let when = format_local(meeting.date_time, lead_timezone);

        self.send_email(EmailMessage {
            to: lead.email.clone(),
            subject: format!("Your viewing of {} is booked", property.address),
            body: format!(
                "Hi {},\n\nYour viewing of {} is confirmed for {} with {}.\n\nSee you there!",
                lead.name, property.address, when, agent.name
            ),
        })
        .await;

        self.send_email(EmailMessage {
            to: agent.email.clone(),
            subject: format!("New viewing booked: {}", property.address),
            body: format!(
                "{} ({}) is booked for {} at {}.",
                lead.name, lead.email, property.address, when
            ),
        })
        .await;

        if let Some(phone) = &lead.phone {
            if let Err(err) = self
                .sms
                .send(
                    phone,
                    &format!(
                        "Your viewing of {} is confirmed for {} with {}.",
                        property.address, when, agent.name
                    ),
                )
                .await
            {
                warn!(to = %phone, error = %err, "sms notification failed");
            }
        }

        let event = RealtimeEvent {
            event: "meeting_booked".into(),
            payload: json!({
                "lead": lead.name,
                "property": property.address,
                "agent": agent.name,
                "start": meeting.date_time,
            }),
        };
        self.realtime.publish(ADMIN_CHANNEL, event.clone());
        self.realtime.publish(&format!("agent:{}", agent.id), event);
    }

    /// A lead landed without a meeting: acknowledge to the lead and let the
    /// admins know someone should follow up.
    pub async fn lead_captured(&self, lead: &Lead) {
        self.send_email(EmailMessage {
            to: lead.email.clone(),
            subject: "We received your inquiry".into(),
            body: format!(
                "Hi {},\n\nThanks for reaching out. An agent will contact you shortly to arrange a viewing.",
                lead.name
            ),
        })
        .await;

        self.realtime.publish(
            ADMIN_CHANNEL,
            RealtimeEvent {
                event: "lead_captured".into(),
                payload: json!({
                    "lead": lead.name,
                    "email": lead.email,
                    "source": lead.source,
                }),
            },
        );
    }

    async fn send_email(&self, message: EmailMessage) {
        let to = message.to.clone();
        if let Err(err) = self.email.send(&message).await {
            warn!(to = %to, error = %err, "email notification failed");
        }
    }
}

/// Format a meeting time in the given IANA timezone, falling back to UTC
/// when the name is absent or unknown.
fn format_local(when: DateTime<Utc>, timezone: Option<&str>) -> String {
    let tz: Tz = timezone.and_then(|name| name.parse().ok()).unwrap_or(chrono_tz::UTC);
    when.with_timezone(&tz).format("%A, %B %-d at %H:%M (%Z)").to_string()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn format_falls_back_to_utc() {
        let when = Utc.with_ymd_and_hms(2030, 6, 3, 13, 0, 0).unwrap();
        assert!(format_local(when, None).contains("13:00"));
        assert!(format_local(when, Some("not/a-zone")).contains("13:00"));
    }

    #[test]
    fn format_converts_to_lead_timezone() {
        let when = Utc.with_ymd_and_hms(2030, 6, 3, 13, 0, 0).unwrap();
        let formatted = format_local(when, Some("America/New_York"));
        assert!(formatted.contains("09:00"), "got {formatted}");
    }
}
