// Shared naming and type helpers for the generators
use once_cell::sync::Lazy;
use regex::Regex;
use crate::schema::{EntitySchema, FieldType};

static ACRONYM_BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"([A-Z]+)([A-Z][a-z])").unwrap());
static WORD_BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"([a-z0-9])([A-Z])").unwrap());
static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s\-]+").unwrap());

/// `BlogPost` -> `blog_post`, `HTTPRequest` -> `http_request`
pub fn snake_case(name: &str) -> String {
    let name = SEPARATORS.replace_all(name.trim(), "_");
    let name = ACRONYM_BOUNDARY.replace_all(&name, "${1}_${2}");
    let name = WORD_BOUNDARY.replace_all(&name, "${1}_${2}");
    name.to_lowercase()
}

/// Naive English plural of a snake_case noun
pub fn pluralize(word: &str) -> String {
    if let Some(stem) = word.strip_suffix('y') {
        let before_y = stem.chars().last();
        if matches!(before_y, Some(c) if !"aeiou".contains(c)) {
            return format!("{}ies", stem);
        }
    }

    if ["s", "x", "z", "ch", "sh"].iter().any(|suffix| word.ends_with(suffix)) {
        return format!("{}es", word);
    }

    format!("{}s", word)
}

/// Per-entity identifiers used across models, routes and tests
pub struct EntityNames {
    /// Model class name, verbatim from the schema
    pub class: String,
    /// Singular snake_case, used for handler parameters
    pub snake: String,
    /// Plural snake_case, used for paths and store names
    pub collection: String,
}

impl EntityNames {
    pub fn for_entity(entity: &EntitySchema) -> Self {
        let snake = snake_case(&entity.name);
        let collection = pluralize(&snake);
        Self {
            class: entity.name.clone(),
            snake,
            collection,
        }
    }
}

/// Python annotation for a schema type
pub fn field_type_to_python(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::Str => "str",
        FieldType::Int => "int",
        FieldType::Bool => "bool",
        FieldType::Float => "float",
    }
}

/// Python literal used as a sample value in generated tests
pub fn sample_value(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::Str => "\"sample\"",
        FieldType::Int => "1",
        FieldType::Bool => "True",
        FieldType::Float => "1.5",
    }
}

/// Quote a name as a Python string literal
pub fn python_string(value: &str) -> String {
    // JSON string escaping is a valid subset of Python string literals
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{}\"", value))
}

pub fn generate_file_header() -> String {
    "# Generated by CRUD API Generator\n\n".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::EntitySchema;

    #[test]
    fn test_snake_case() {
        assert_eq!(snake_case("Post"), "post");
        assert_eq!(snake_case("BlogPost"), "blog_post");
        assert_eq!(snake_case("HTTPRequest"), "http_request");
        assert_eq!(snake_case("Order2Item"), "order2_item");
        assert_eq!(snake_case("user story"), "user_story");
        assert_eq!(snake_case("already_snake"), "already_snake");
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("post"), "posts");
        assert_eq!(pluralize("category"), "categories");
        assert_eq!(pluralize("day"), "days");
        assert_eq!(pluralize("status"), "statuses");
        assert_eq!(pluralize("box"), "boxes");
        assert_eq!(pluralize("match"), "matches");
        assert_eq!(pluralize("wish"), "wishes");
        assert_eq!(pluralize("y"), "ys");
    }

    #[test]
    fn test_entity_names() {
        let names = EntityNames::for_entity(&EntitySchema::new("UserStory", vec![]));
        assert_eq!(names.class, "UserStory");
        assert_eq!(names.snake, "user_story");
        assert_eq!(names.collection, "user_stories");
    }

    #[test]
    fn test_python_string_escapes_quotes() {
        assert_eq!(python_string("title"), "\"title\"");
        assert_eq!(python_string("a\"b"), "\"a\\\"b\"");
    }
}
