// Pydantic model generator (app/models.py)
use std::fmt::Write;
use crate::error::AppResult;
use crate::schema::{EntitySchema, GenerationRequest};
use super::utils;

pub struct ModelsGenerator<'a> {
    request: &'a GenerationRequest,
}

impl<'a> ModelsGenerator<'a> {
    pub fn new(request: &'a GenerationRequest) -> Self {
        Self { request }
    }

    /// Generate one model class per entity, in declaration order
    pub fn generate_models(&self) -> AppResult<String> {
        let mut content = utils::generate_file_header();
        content.push_str("from pydantic import BaseModel\n");

        for entity in &self.request.entities {
            content.push_str(&self.generate_model_class(entity)?);
        }

        Ok(content)
    }

    fn generate_model_class(&self, entity: &EntitySchema) -> AppResult<String> {
        let mut class = String::new();
        writeln!(class, "\n\nclass {}(BaseModel):", entity.name)?;

        if entity.fields.is_empty() {
            class.push_str("    pass\n");
            return Ok(class);
        }

        // Relations keep their declared primitive type; no foreign-key wiring
        for field in &entity.fields {
            writeln!(
                class,
                "    {}: {}",
                field.name,
                utils::field_type_to_python(field.field_type)
            )?;
        }

        Ok(class)
    }
}
