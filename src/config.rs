//! Environment-sourced settings.
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file. Only the LLM API key is mandatory; everything else has a default.

use crate::error::{PlannerError, Result};
use std::{str::FromStr, time::Duration};

pub const DEFAULT_LLM_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_LLM_MODEL: &str = "llama-3.1-70b-versatile";
pub const DEFAULT_LANGFUSE_HOST: &str = "https://cloud.langfuse.com";

/// Language-model client settings shared by every agent
#[derive(Debug, Clone, PartialEq)]
pub struct LlmSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub timeout: Duration,
    pub max_iterations: usize,
    pub max_retries: usize,
}

impl Default for LlmSettings {
    /// Defaults for everything but the API key, which is left empty
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_LLM_BASE_URL.to_string(),
            model: DEFAULT_LLM_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: Some(1024),
            timeout: Duration::from_secs(120),
            max_iterations: 10,
            max_retries: 0,
        }
    }
}

/// Observability platform credentials. Carried but not exported to.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LangfuseSettings {
    pub public_key: String,
    pub secret_key: String,
    pub host: String,
}

impl LangfuseSettings {
    pub fn is_configured(&self) -> bool {
        !self.public_key.is_empty() && !self.secret_key.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub llm: LlmSettings,
    pub langfuse: LangfuseSettings,
    /// Unused by the mock weather provider
    pub weather_api_key: String,
    pub server: ServerSettings,
}

impl Settings {
    /// Load `.env` (if present) and read settings from the environment
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_key = get("GROQ_API_KEY").ok_or_else(|| {
            PlannerError::Config(
                "GROQ_API_KEY environment variable must be set before starting the planner"
                    .to_string(),
            )
        })?;

        let llm = LlmSettings {
            api_key,
            base_url: get("LLM_BASE_URL").unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string()),
            model: get("LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
            temperature: parse_or("LLM_TEMPERATURE", get("LLM_TEMPERATURE"), 0.7)?,
            max_tokens: Some(parse_or("LLM_MAX_TOKENS", get("LLM_MAX_TOKENS"), 1024)?),
            timeout: Duration::from_secs(parse_or(
                "LLM_TIMEOUT_SECS",
                get("LLM_TIMEOUT_SECS"),
                120,
            )?),
            max_iterations: parse_or("LLM_MAX_ITERATIONS", get("LLM_MAX_ITERATIONS"), 10)?,
            max_retries: parse_or("LLM_MAX_RETRIES", get("LLM_MAX_RETRIES"), 0)?,
        };

        let langfuse = LangfuseSettings {
            public_key: get("LANGFUSE_PUBLIC_KEY").unwrap_or_default(),
            secret_key: get("LANGFUSE_SECRET_KEY").unwrap_or_default(),
            host: get("LANGFUSE_HOST").unwrap_or_else(|| DEFAULT_LANGFUSE_HOST.to_string()),
        };

        let server = ServerSettings {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or("PORT", get("PORT"), 8000)?,
        };

        Ok(Self {
            llm,
            langfuse,
            weather_api_key: get("WEATHER_API_KEY").unwrap_or_default(),
            server,
        })
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value.trim().parse().map_err(|err| {
            PlannerError::Config(format!("{key} has invalid value '{value}': {err}"))
        }),
        None => Ok(default),
    }
}
