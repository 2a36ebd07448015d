//! Event translation — hub outbox notifications → plugin channel maps.
//!
//! Pure deterministic mapping. Translation rules:
//!   DataStore.outboxMutationProcessed → {eventName, modelName, element}
//!   DataStore.outboxMutationEnqueued  → {eventName, modelName, element}
//!   (all others)                      → None (not forwarded)
//!
//! A failed element translation surfaces as `SchemaAcquisitionFailed` with the
//! element error kept as its source.

use std::sync::Arc;

use crate::hub::{short_event_name, HubElement, HubNotification, HubPayload, OutboxNotification};
use crate::model::ModelRegistry;
use crate::types::{Error, Result};
use crate::value::{MapValue, ValueMap};

/// Event-name normalizer applied to raw hub names.
pub type Normalizer = fn(&str) -> String;

/// A translated outbox mutation event.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslatedEvent {
    event_name: String,
    model_name: String,
    element: HubElement,
}

impl TranslatedEvent {
    /// Build the event, shortening `raw_event_name` with [`short_event_name`].
    pub fn try_new<N>(notification: &N, raw_event_name: &str, registry: &ModelRegistry) -> Result<Self>
    where
        N: OutboxNotification + ?Sized,
    {
        Self::try_new_with(notification, raw_event_name, registry, short_event_name)
    }

    /// Build the event with a caller-supplied event-name normalizer.
    pub fn try_new_with<N, F>(
        notification: &N,
        raw_event_name: &str,
        registry: &ModelRegistry,
        normalize: F,
    ) -> Result<Self>
    where
        N: OutboxNotification + ?Sized,
        F: FnOnce(&str) -> String,
    {
        let model_name = notification.model_name().to_string();
        let element = HubElement::translate(notification.element(), registry, &model_name)
            .map_err(|source| Error::schema_acquisition(model_name.clone(), source))?;

        Ok(Self {
            event_name: normalize(raw_event_name),
            model_name,
            element,
        })
    }

    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn element(&self) -> &HubElement {
        &self.element
    }

    pub fn to_value_map(&self) -> ValueMap {
        let mut map = ValueMap::with_capacity(3);
        map.insert("eventName".to_string(), self.event_name.as_str().into());
        map.insert("modelName".to_string(), self.model_name.as_str().into());
        map.insert(
            "element".to_string(),
            MapValue::Map(self.element.to_value_map()),
        );
        map
    }
}

/// Translates hub notifications against a shared model registry.
#[derive(Clone)]
pub struct EventTranslator {
    registry: Arc<ModelRegistry>,
    normalize: Normalizer,
}

impl std::fmt::Debug for EventTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventTranslator")
            .field("models", &self.registry.len())
            .finish_non_exhaustive()
    }
}

impl EventTranslator {
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        Self::with_normalizer(registry, short_event_name)
    }

    pub fn with_normalizer(registry: Arc<ModelRegistry>, normalize: Normalizer) -> Self {
        Self {
            registry,
            normalize,
        }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Translate one outbox notification into an event.
    pub fn construct<N>(&self, notification: &N, raw_event_name: &str) -> Result<TranslatedEvent>
    where
        N: OutboxNotification + ?Sized,
    {
        TranslatedEvent::try_new_with(notification, raw_event_name, &self.registry, self.normalize)
    }

    /// Translate a hub notification into its channel map.
    ///
    /// Returns `Ok(None)` for hub events that are not forwarded.
    pub fn translate(&self, notification: &HubNotification) -> Result<Option<ValueMap>> {
        let Some(kind) = notification.kind() else {
            tracing::trace!("Hub event {} not forwarded", notification.event_name);
            return Ok(None);
        };

        match &notification.payload {
            HubPayload::OutboxMutation(mutation) => {
                let event = self.construct(mutation, &notification.event_name)?;
                tracing::debug!(
                    "Translated {:?} for model {}",
                    kind,
                    event.model_name()
                );
                Ok(Some(event.to_value_map()))
            }
            HubPayload::Other(_) => Err(Error::invalid_payload(format!(
                "{} carries no outbox mutation",
                notification.event_name
            ))),
        }
    }
}
