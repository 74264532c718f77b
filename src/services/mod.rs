// Services that talk to systems outside the process

pub mod schema_inference;

pub use schema_inference::{CompletionClient, Credentials, GeminiClient, InferenceConfig, SchemaInference};
