use std::path::PathBuf;

use anyhow::{Context, Result};

/// Processor configuration loaded from environment variables.
/// Fails at startup if the credential is missing or a numeric setting is malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub groq_api_key: String,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub llm_max_attempts: u32,
    pub llm_timeout_secs: u64,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            groq_api_key: require_env("GROQ_API_KEY")?,
            input_dir: std::env::var("ALUMNI_INPUT_DIR")
                .unwrap_or_else(|_| "client/data/alumnidata".to_string())
                .into(),
            output_dir: std::env::var("ALUMNI_OUTPUT_DIR")
                .unwrap_or_else(|_| "client/data/validated_data".to_string())
                .into(),
            llm_max_attempts: parse_env("LLM_MAX_ATTEMPTS", 1)?.max(1),
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", 120)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    let value = std::env::var(key)
        .with_context(|| format!("Required environment variable '{key}' is not set"))?;
    if value.trim().is_empty() {
        anyhow::bail!("Required environment variable '{key}' is empty");
    }
    Ok(value)
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}
