use crate::dispatch::MissingCredentials;
use crate::llm::{DEFAULT_BASE_URL, DEFAULT_MODEL, LlmSettings};
use crate::models::Credentials;
use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_AMADEUS_BASE_URL: &str = "https://test.api.amadeus.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct AmadeusSettings {
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub amadeus: AmadeusSettings,
    pub llm: LlmSettings,
    pub missing_credentials: MissingCredentials,
    pub http_timeout: Duration,
    pub catalog_path: Option<PathBuf>,
}

/// Flat view of the environment; keys are the lowercased variable names.
#[derive(Debug, Deserialize)]
struct EnvSettings {
    amadeus_api_key: Option<String>,
    amadeus_api_secret: Option<String>,
    amadeus_base_url: String,
    llm_api_key: Option<String>,
    groq_api_key: Option<String>,
    llm_base_url: String,
    llm_model: String,
    missing_credentials: String,
    http_timeout_secs: u64,
    catalog_path: Option<PathBuf>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl AppConfig {
    /// Reads the process environment (load `.env` first).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(Environment::default())
    }

    fn from_source(environment: Environment) -> Result<Self, ConfigError> {
        let env: EnvSettings = Config::builder()
            .set_default("amadeus_base_url", DEFAULT_AMADEUS_BASE_URL)?
            .set_default("llm_base_url", DEFAULT_BASE_URL)?
            .set_default("llm_model", DEFAULT_MODEL)?
            .set_default("missing_credentials", "error")?
            .set_default("http_timeout_secs", DEFAULT_TIMEOUT_SECS)?
            .add_source(environment.ignore_empty(true))
            .build()?
            .try_deserialize()?;

        if env.http_timeout_secs == 0 {
            return Err(ConfigError::Message("HTTP_TIMEOUT_SECS must be a positive integer".to_string()));
        }
        let http_timeout = Duration::from_secs(env.http_timeout_secs);

        let missing_credentials = env
            .missing_credentials
            .parse::<MissingCredentials>()
            .map_err(|e| ConfigError::Message(format!("MISSING_CREDENTIALS: {}", e)))?;

        let amadeus_base_url = non_blank(Some(env.amadeus_base_url)).unwrap_or_else(|| DEFAULT_AMADEUS_BASE_URL.to_string());
        let llm_base_url = non_blank(Some(env.llm_base_url)).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let llm_model = non_blank(Some(env.llm_model)).unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Ok(Self {
            amadeus: AmadeusSettings {
                api_key: non_blank(env.amadeus_api_key),
                api_secret: non_blank(env.amadeus_api_secret),
                base_url: amadeus_base_url,
            },
            llm: LlmSettings {
                api_key: non_blank(env.llm_api_key).or_else(|| non_blank(env.groq_api_key)),
                base_url: llm_base_url,
                model: llm_model,
                timeout: http_timeout,
            },
            missing_credentials,
            http_timeout,
            catalog_path: env.catalog_path,
        })
    }

    /// Configured provider credentials, if they are real values.
    pub fn provider_credentials(&self) -> Option<Credentials> {
        Credentials::usable(self.amadeus.api_key.as_deref(), self.amadeus.api_secret.as_deref())
    }
}
