// Entity Schema - declarative description of the entities to generate
// Validated at the boundary (HTTP body, CLI file, LLM reply) and consumed read-only by codegen

use std::collections::HashSet;
use std::fmt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::error::{AppError, AppResult};

/// Root value passed to the code generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub entities: Vec<EntitySchema>,
}

/// Entity definition - a named model with ordered fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySchema {
    /// Singular CamelCase by convention, e.g. `Post` or `BlogPost`
    pub name: String,
    /// Declaration order is preserved in generated source
    pub fields: Vec<FieldSchema>,
}

/// Field definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<Relation>,
}

/// Primitive field types accepted in a schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Str,
    Int,
    Bool,
    Float,
}

/// Reference to another entity by its declared name.
/// Carries no cardinality and is not resolved during validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub target_entity: String,
}

/// Module-level names in the generated project that an entity class would rebind
const RESERVED_CLASS_NAMES: &[&str] = &["BaseModel", "app", "int", "str", "bool", "float"];

impl GenerationRequest {
    pub fn new(entities: Vec<EntitySchema>) -> Self {
        Self { entities }
    }

    /// Validate an arbitrary JSON value into a request.
    /// The error names the first structural violation found.
    pub fn from_value(value: Value) -> AppResult<Self> {
        serde_json::from_value(value).map_err(|e| AppError::SchemaValidationError(e.to_string()))
    }

    pub fn from_json_str(raw: &str) -> AppResult<Self> {
        serde_json::from_str(raw).map_err(|e| AppError::SchemaValidationError(e.to_string()))
    }

    /// Advisory consistency checks. Findings never block generation.
    pub fn lint(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        let declared: HashSet<&str> = self.entities.iter().map(|e| e.name.as_str()).collect();

        let mut seen_entities = HashSet::new();
        for entity in &self.entities {
            if !seen_entities.insert(entity.name.as_str()) {
                warnings.push(format!("Entity '{}' is declared more than once", entity.name));
            }
            if RESERVED_CLASS_NAMES.contains(&entity.name.as_str()) {
                warnings.push(format!(
                    "Entity '{}' shadows a name the generated code relies on",
                    entity.name
                ));
            }

            let mut seen_fields = HashSet::new();
            for field in &entity.fields {
                if !seen_fields.insert(field.name.as_str()) {
                    warnings.push(format!(
                        "Entity '{}' declares field '{}' more than once",
                        entity.name, field.name
                    ));
                }

                if let Some(relation) = &field.relation {
                    if !declared.contains(relation.target_entity.as_str()) {
                        warnings.push(format!(
                            "Field '{}.{}' relates to undefined entity '{}'",
                            entity.name, field.name, relation.target_entity
                        ));
                    }
                }
            }
        }

        warnings
    }
}

impl EntitySchema {
    pub fn new(name: &str, fields: Vec<FieldSchema>) -> Self {
        Self {
            name: name.to_string(),
            fields,
        }
    }
}

impl FieldSchema {
    pub fn new(name: &str, field_type: FieldType) -> Self {
        Self {
            name: name.to_string(),
            field_type,
            relation: None,
        }
    }

    /// Annotate the field with a relation to another entity
    pub fn relates_to(mut self, target_entity: &str) -> Self {
        self.relation = Some(Relation {
            target_entity: target_entity.to_string(),
        });
        self
    }
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Str => "str",
            FieldType::Int => "int",
            FieldType::Bool => "bool",
            FieldType::Float => "float",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
