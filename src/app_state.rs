use std::sync::Arc;
use crate::{
    config::Config,
    services::SchemaInference,
};

#[derive(Clone)]
pub struct AppState {
    pub inference: Arc<SchemaInference>,
}

impl AppState {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let inference = SchemaInference::gemini(config.inference())?;
        if !inference.is_configured() {
            tracing::warn!("LLM_API_KEY or LLM_API_URL is not set; text-to-schema requests will fail");
        }

        Ok(Self::with_inference(inference))
    }

    pub fn with_inference(inference: SchemaInference) -> Self {
        Self {
            inference: Arc::new(inference),
        }
    }
}
