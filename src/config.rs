use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use crate::services::schema_inference::{InferenceConfig, DEFAULT_TIMEOUT_SECS};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origin: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub api_url: Option<String>,
    pub timeout_secs: u64,
}

impl Config {
    /// Read configuration once at startup. Missing LLM credentials are not
    /// an error here; inference reports them when it is used.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            server: ServerConfig {
                host: env::var("SERVER_HOST")
                    .unwrap_or_else(|_| "127.0.0.1".to_string()),
                port: env::var("SERVER_PORT")
                    .unwrap_or_else(|_| "8000".to_string())
                    .parse()
                    .unwrap_or(8000),
                cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                    .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            },
            llm: LlmConfig {
                api_key: env::var("LLM_API_KEY").ok().filter(|v| !v.is_empty()),
                api_url: env::var("LLM_API_URL").ok().filter(|v| !v.is_empty()),
                timeout_secs: env::var("LLM_TIMEOUT_SECS")
                    .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
                    .parse()
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            },
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn inference(&self) -> InferenceConfig {
        InferenceConfig {
            api_key: self.llm.api_key.clone(),
            api_url: self.llm.api_url.clone(),
            timeout: Duration::from_secs(self.llm.timeout_secs),
        }
    }
}
