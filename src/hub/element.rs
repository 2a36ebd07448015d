//! Element translation — outbox payload → schema-shaped value map.
//!
//! The engine hands over its model instance as a dynamic value. Translation
//! resolves the model's schema in the registry and rebuilds the instance
//! field by field, in schema order:
//!
//! ```text
//! element ─┬─ model ─┬─ id
//!          │         ├─ modelName
//!          │         └─ serializedData { <schema fields> }
//!          ├─ version
//!          ├─ lastChangedAt
//!          └─ deleted
//! ```

use serde_json::Value;

use crate::hub::OutboxElement;
use crate::model::{FieldType, ModelField, ModelRegistry, ModelSchema};
use crate::types::ElementError;
use crate::value::{MapValue, ValueMap};

/// A translated outbox element.
#[derive(Debug, Clone, PartialEq)]
pub struct HubElement {
    model: ValueMap,
    version: Option<i64>,
    last_changed_at: Option<i64>,
    deleted: bool,
}

impl HubElement {
    /// Translate `payload` against the schema registered for `model_name`.
    pub fn translate(
        payload: &OutboxElement,
        registry: &ModelRegistry,
        model_name: &str,
    ) -> Result<Self, ElementError> {
        let schema = registry
            .schema(model_name)
            .ok_or_else(|| ElementError::ModelNotFound(model_name.to_string()))?;

        Ok(Self {
            model: serialize_model(&payload.model, schema, registry)?,
            version: payload.version,
            last_changed_at: payload.last_changed_at,
            deleted: payload.deleted,
        })
    }

    pub fn model(&self) -> &ValueMap {
        &self.model
    }

    pub fn version(&self) -> Option<i64> {
        self.version
    }

    pub fn last_changed_at(&self) -> Option<i64> {
        self.last_changed_at
    }

    pub fn deleted(&self) -> bool {
        self.deleted
    }

    pub fn to_value_map(&self) -> ValueMap {
        let mut map = ValueMap::with_capacity(4);
        map.insert("model".to_string(), MapValue::Map(self.model.clone()));
        map.insert("version".to_string(), self.version.into());
        map.insert("lastChangedAt".to_string(), self.last_changed_at.into());
        map.insert("deleted".to_string(), self.deleted.into());
        map
    }
}

/// Serialize one model instance as `{id, modelName, serializedData}`.
fn serialize_model(
    instance: &Value,
    schema: &ModelSchema,
    registry: &ModelRegistry,
) -> Result<ValueMap, ElementError> {
    let object = instance.as_object().ok_or_else(|| ElementError::NotAnObject {
        model_name: schema.name.clone(),
    })?;

    let id = object
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| ElementError::MissingId {
            model_name: schema.name.clone(),
        })?;

    let mut data = ValueMap::with_capacity(schema.fields.len());
    for field in &schema.fields {
        if matches!(field.field_type, FieldType::Collection { .. }) {
            continue;
        }

        match object.get(&field.name) {
            None | Some(Value::Null) if field.is_required => {
                return Err(ElementError::MissingField {
                    model_name: schema.name.clone(),
                    field: field.name.clone(),
                });
            }
            None => {}
            Some(Value::Null) => {
                data.insert(field.name.clone(), MapValue::Null);
            }
            Some(value) => {
                let converted = convert_field(field, value, schema, registry)?;
                data.insert(field.name.clone(), converted);
            }
        }
    }

    let mut model = ValueMap::with_capacity(3);
    model.insert("id".to_string(), id.into());
    model.insert("modelName".to_string(), schema.name.as_str().into());
    model.insert("serializedData".to_string(), MapValue::Map(data));
    Ok(model)
}

fn convert_field(
    field: &ModelField,
    value: &Value,
    schema: &ModelSchema,
    registry: &ModelRegistry,
) -> Result<MapValue, ElementError> {
    if !field.is_array {
        return convert_scalar(field, value, schema, registry);
    }

    let items = value.as_array().ok_or_else(|| mismatch(field, schema))?;
    items
        .iter()
        .map(|item| match item {
            Value::Null => Ok(MapValue::Null),
            _ => convert_scalar(field, item, schema, registry),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(MapValue::List)
}

fn convert_scalar(
    field: &ModelField,
    value: &Value,
    schema: &ModelSchema,
    registry: &ModelRegistry,
) -> Result<MapValue, ElementError> {
    let converted = match &field.field_type {
        FieldType::String
        | FieldType::Date
        | FieldType::DateTime
        | FieldType::Time
        | FieldType::Enum { .. } => value.as_str().map(MapValue::from),
        FieldType::Int | FieldType::Timestamp => value.as_i64().map(MapValue::Int),
        FieldType::Double => value.as_f64().map(MapValue::Double),
        FieldType::Bool => value.as_bool().map(MapValue::Bool),
        FieldType::Json => Some(MapValue::from(value)),
        FieldType::Model { target } => {
            let target_schema = registry
                .schema(target)
                .ok_or_else(|| ElementError::ModelNotFound(target.clone()))?;
            return serialize_model(value, target_schema, registry).map(MapValue::Map);
        }
        // Skipped by the caller
        FieldType::Collection { .. } => Some(MapValue::Null),
    };

    converted.ok_or_else(|| mismatch(field, schema))
}

fn mismatch(field: &ModelField, schema: &ModelSchema) -> ElementError {
    ElementError::FieldTypeMismatch {
        model_name: schema.name.clone(),
        field: field.name.clone(),
        expected: field.field_type.clone(),
    }
}
