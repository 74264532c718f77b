// CRUD API Generator - schema-driven FastAPI project generation

// Entity schema - validated description of the entities to generate
pub mod schema;

// Code generation - renders a schema into project files
pub mod codegen;

// Packaging of rendered files
pub mod archive;

// External services (LLM schema inference)
pub mod services;

// HTTP surface
pub mod app_state;
pub mod config;
pub mod generator_interface;

// Common utilities
pub mod error;

// Re-exports for convenience
pub use error::{AppError, AppResult};
pub use schema::{EntitySchema, FieldSchema, FieldType, GenerationRequest, Relation};
