//! Notification senders: HTTP email, HTTP SMS, and the in-process realtime
//! broadcast hub.

mod email;
mod realtime;
mod sms;

pub use email::{HttpEmailSender, NoopEmailSender};
pub use realtime::BroadcastHub;
pub use sms::{HttpSmsSender, NoopSmsSender};
