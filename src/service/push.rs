//! Outbound push notifications
//!
//! The transport that actually reaches a client is external. The engine only
//! needs `push(org, channel, payload)`; `ChannelPush` implements it over an
//! unbounded channel so an embedding server (or the CLI) can drain messages
//! on its own schedule.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::mpsc;

/// Push delivery failure
#[derive(Debug, Error)]
pub enum PushError {
    /// The receiving side is gone
    #[error("Push channel closed: {0}")]
    Disconnected(String),
}

/// Delivers a payload to every client of `org_id` listening on `channel`.
pub trait PushApi: Send + Sync {
    /// Best-effort delivery.
    fn push(&self, org_id: &str, channel: &str, payload: Value) -> Result<(), PushError>;
}

/// A pushed message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PushMessage {
    /// Organization the message is addressed to
    pub org_id: String,
    /// Channel name
    pub channel: String,
    /// Message body
    pub payload: Value,
}

/// Push sender half
pub type PushSender = mpsc::UnboundedSender<PushMessage>;

/// Push receiver half
pub type PushReceiver = mpsc::UnboundedReceiver<PushMessage>;

/// `PushApi` over an unbounded tokio channel.
#[derive(Debug, Clone)]
pub struct ChannelPush {
    sender: PushSender,
}

impl ChannelPush {
    /// Creates the push side and the receiver that drains it.
    pub fn new() -> (Self, PushReceiver) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl PushApi for ChannelPush {
    fn push(&self, org_id: &str, channel: &str, payload: Value) -> Result<(), PushError> {
        self.sender
            .send(PushMessage {
                org_id: org_id.to_string(),
                channel: channel.to_string(),
                payload,
            })
            .map_err(|_| PushError::Disconnected(channel.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_channel_push_delivers_in_order() {
        let (push, mut rx) = ChannelPush::new();
        push.push("org", "a", json!(1)).unwrap();
        push.push("org", "b", json!(2)).unwrap();

        assert_eq!(rx.try_recv().unwrap().channel, "a");
        assert_eq!(rx.try_recv().unwrap().payload, json!(2));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_dropped_receiver_is_reported() {
        let (push, rx) = ChannelPush::new();
        drop(rx);
        assert!(matches!(
            push.push("org", "gone", json!(null)),
            Err(PushError::Disconnected(_))
        ));
    }
}
