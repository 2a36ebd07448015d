//! Model schemas and the registry used to interpret hub payloads.
//!
//! The registry maps a model name to its ordered field definitions. Element
//! translation resolves the notification's model name here before touching
//! the payload.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Field type of a model field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FieldType {
    String,
    Int,
    Double,
    Bool,
    Date,
    DateTime,
    Time,
    Timestamp,
    Enum { name: String },
    Json,
    /// Belongs-to / has-one: the value is a nested instance of `target`.
    Model { target: String },
    /// Has-many: never carried in the element payload.
    Collection { target: String },
}

/// A single field of a model schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub is_array: bool,
}

impl ModelField {
    pub fn required(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            is_required: true,
            is_array: false,
        }
    }

    pub fn optional(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            is_required: false,
            is_array: false,
        }
    }

    pub fn array(mut self) -> Self {
        self.is_array = true;
        self
    }
}

/// Ordered field definitions for one model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSchema {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<ModelField>,
}

impl ModelSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: ModelField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn field(&self, name: &str) -> Option<&ModelField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Lookup table from model name to schema.
///
/// Deserializes from a list of schemas; a later schema with the same name
/// replaces an earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ModelSchema>", into = "Vec<ModelSchema>")]
pub struct ModelRegistry {
    schemas: HashMap<String, ModelSchema>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a schema, returning the one it replaced.
    pub fn register(&mut self, schema: ModelSchema) -> Option<ModelSchema> {
        self.schemas.insert(schema.name.clone(), schema)
    }

    pub fn schema(&self, model_name: &str) -> Option<&ModelSchema> {
        self.schemas.get(model_name)
    }

    pub fn contains(&self, model_name: &str) -> bool {
        self.schemas.contains_key(model_name)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

impl FromIterator<ModelSchema> for ModelRegistry {
    fn from_iter<I: IntoIterator<Item = ModelSchema>>(iter: I) -> Self {
        let mut registry = Self::new();
        for schema in iter {
            registry.register(schema);
        }
        registry
    }
}

impl From<Vec<ModelSchema>> for ModelRegistry {
    fn from(schemas: Vec<ModelSchema>) -> Self {
        schemas.into_iter().collect()
    }
}

impl From<ModelRegistry> for Vec<ModelSchema> {
    fn from(registry: ModelRegistry) -> Self {
        let mut schemas: Vec<ModelSchema> = registry.schemas.into_values().collect();
        schemas.sort_by(|a, b| a.name.cmp(&b.name));
        schemas
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = ModelRegistry::new();
        assert!(registry.is_empty());

        registry.register(
            ModelSchema::new("Post").with_field(ModelField::required("title", FieldType::String)),
        );

        assert!(registry.contains("Post"));
        assert!(!registry.contains("post"));
        assert_eq!(registry.len(), 1);
        let schema = registry.schema("Post").unwrap();
        assert_eq!(schema.field("title").unwrap().field_type, FieldType::String);
        assert!(schema.field("missing").is_none());
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut registry = ModelRegistry::new();
        registry.register(ModelSchema::new("Post"));
        let replaced = registry.register(
            ModelSchema::new("Post").with_field(ModelField::optional("body", FieldType::String)),
        );

        assert_eq!(replaced, Some(ModelSchema::new("Post")));
        assert_eq!(registry.schema("Post").unwrap().fields.len(), 1);
    }

    #[test]
    fn test_deserialize_from_schema_list() {
        let registry: ModelRegistry = serde_json::from_value(serde_json::json!([
            {
                "name": "Post",
                "fields": [
                    { "name": "title", "type": { "kind": "string" }, "isRequired": true },
                    { "name": "blog", "type": { "kind": "model", "target": "Blog" } },
                    { "name": "tags", "type": { "kind": "string" }, "isArray": true },
                    { "name": "status", "type": { "kind": "enum", "name": "PostStatus" } }
                ]
            },
            { "name": "Blog" }
        ]))
        .unwrap();

        assert_eq!(registry.len(), 2);
        let post = registry.schema("Post").unwrap();
        assert!(post.fields[0].is_required);
        assert_eq!(
            post.fields[1].field_type,
            FieldType::Model {
                target: "Blog".to_string()
            }
        );
        assert!(post.fields[2].is_array);
        assert!(!post.fields[3].is_required);
        assert!(registry.schema("Blog").unwrap().fields.is_empty());
    }
}
