//! Hub notifications — outbox mutation events from the sync engine.
//!
//! Notifications arrive with the engine's raw event name and an opaque
//! payload. Only the outbox mutation events are translated and forwarded;
//! every other hub event is filtered.

use serde::{Deserialize, Serialize};

pub mod element;
pub mod forwarder;
pub mod translation;

pub use element::HubElement;
pub use forwarder::{Delivery, ForwardStats, HubForwarder};
pub use translation::{EventTranslator, TranslatedEvent};

/// Raw hub name of the processed notification.
pub const OUTBOX_MUTATION_PROCESSED: &str = "DataStore.outboxMutationProcessed";
/// Raw hub name of the enqueued notification.
pub const OUTBOX_MUTATION_ENQUEUED: &str = "DataStore.outboxMutationEnqueued";

/// Shorten a raw hub event name to its last dotted segment.
///
/// `"DataStore.outboxMutationProcessed"` → `"outboxMutationProcessed"`.
/// Names without a dot are returned unchanged.
pub fn short_event_name(event_name: &str) -> String {
    match event_name.rfind('.') {
        Some(idx) => event_name[idx + 1..].to_string(),
        None => event_name.to_string(),
    }
}

/// Hub events this bridge forwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HubEventKind {
    OutboxMutationProcessed,
    OutboxMutationEnqueued,
}

impl HubEventKind {
    /// Classify a raw event name by its short form.
    pub fn from_event_name(event_name: &str) -> Option<Self> {
        match short_event_name(event_name).as_str() {
            "outboxMutationProcessed" => Some(Self::OutboxMutationProcessed),
            "outboxMutationEnqueued" => Some(Self::OutboxMutationEnqueued),
            _ => None,
        }
    }
}

/// Sync metadata and model instance carried by an outbox mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboxElement {
    /// Model instance as produced by the engine; interpreted via the registry.
    pub model: serde_json::Value,
    #[serde(default)]
    pub version: Option<i64>,
    #[serde(default)]
    pub last_changed_at: Option<i64>,
    #[serde(default)]
    pub deleted: bool,
}

/// What a translator needs from an outbox notification.
pub trait OutboxNotification {
    fn model_name(&self) -> &str;
    fn element(&self) -> &OutboxElement;
}

/// Outbox mutation notification payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboxMutation {
    pub model_name: String,
    pub element: OutboxElement,
}

impl OutboxNotification for OutboxMutation {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn element(&self) -> &OutboxElement {
        &self.element
    }
}

/// Payload attached to a hub notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HubPayload {
    OutboxMutation(OutboxMutation),
    /// Payloads of hub events this bridge does not translate.
    Other(serde_json::Value),
}

/// A notification as delivered by the engine's hub.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HubNotification {
    pub event_name: String,
    pub payload: HubPayload,
}

impl HubNotification {
    pub fn outbox_mutation(event_name: impl Into<String>, mutation: OutboxMutation) -> Self {
        Self {
            event_name: event_name.into(),
            payload: HubPayload::OutboxMutation(mutation),
        }
    }

    pub fn kind(&self) -> Option<HubEventKind> {
        HubEventKind::from_event_name(&self.event_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_event_name() {
        assert_eq!(
            short_event_name(OUTBOX_MUTATION_PROCESSED),
            "outboxMutationProcessed"
        );
        assert_eq!(
            short_event_name("amplify.datastore.outboxMutationProcessed"),
            "outboxMutationProcessed"
        );
        assert_eq!(short_event_name("ready"), "ready");
        assert_eq!(short_event_name("DataStore."), "");
        assert_eq!(short_event_name(""), "");
    }

    #[test]
    fn test_event_kind_from_name() {
        assert_eq!(
            HubEventKind::from_event_name(OUTBOX_MUTATION_PROCESSED),
            Some(HubEventKind::OutboxMutationProcessed)
        );
        assert_eq!(
            HubEventKind::from_event_name(OUTBOX_MUTATION_ENQUEUED),
            Some(HubEventKind::OutboxMutationEnqueued)
        );
        assert_eq!(HubEventKind::from_event_name("DataStore.syncQueriesStarted"), None);
        assert_eq!(HubEventKind::from_event_name("DataStore.ready"), None);
    }

    #[test]
    fn test_deserialize_notification() {
        let notification: HubNotification = serde_json::from_value(serde_json::json!({
            "eventName": OUTBOX_MUTATION_PROCESSED,
            "payload": {
                "modelName": "Post",
                "element": {
                    "model": { "id": "p-1", "title": "hello" },
                    "version": 2,
                    "lastChangedAt": 1_700_000_000_000i64
                }
            }
        }))
        .unwrap();

        assert_eq!(notification.kind(), Some(HubEventKind::OutboxMutationProcessed));
        match notification.payload {
            HubPayload::OutboxMutation(mutation) => {
                assert_eq!(mutation.model_name(), "Post");
                assert_eq!(mutation.element().version, Some(2));
                assert!(!mutation.element().deleted);
            }
            HubPayload::Other(other) => panic!("expected outbox mutation, got {other}"),
        }
    }

    #[test]
    fn test_deserialize_other_payload() {
        let notification: HubNotification = serde_json::from_value(serde_json::json!({
            "eventName": "DataStore.networkStatus",
            "payload": { "active": true }
        }))
        .unwrap();

        assert_eq!(notification.kind(), None);
        assert!(matches!(notification.payload, HubPayload::Other(_)));
    }
}
