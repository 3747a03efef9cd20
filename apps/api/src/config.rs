use anyhow::{Context, Result};

use crate::llm_client::ProviderKind;

const DEFAULT_IMAGE_HOST: &str = "source.unsplash.com";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub provider: ProviderKind,
    /// Not validated: a missing key surfaces as a provider auth failure on the first call.
    pub api_key: String,
    pub image_host: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let provider = match std::env::var("LLM_PROVIDER") {
            Ok(raw) => ProviderKind::parse(&raw)
                .with_context(|| format!("LLM_PROVIDER '{raw}' is not one of: groq, openai"))?,
            Err(_) => ProviderKind::default(),
        };

        Ok(Config {
            provider,
            api_key: std::env::var(provider.api_key_env()).unwrap_or_default(),
            image_host: std::env::var("IMAGE_HOST")
                .unwrap_or_else(|_| DEFAULT_IMAGE_HOST.to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}
