//! Application configuration, loaded from the environment (and `.env` in development).

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use crate::api_connection::endpoints::{DEFAULT_MODEL, OPENROUTER_BASE_URL};
use crate::api_connection::Provider;
use crate::assistant::{AssistantBackend, DisabledAssistant, LlmAssistant};
use crate::mealdb::{MealDbClient, MEALDB_BASE_URL};
use crate::shopping_list::FileStorage;

pub const DEFAULT_API_KEY_ENV_VAR: &str = "OPENROUTER_API_KEY";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub mealdb_base_url: String,
    /// Feature flag for the remote assistant. Off means heuristics only.
    pub assistant_enabled: bool,
    pub assistant_api_key_env_var: String,
    pub assistant_base_url: String,
    pub assistant_model: String,
    pub shopping_list_path: PathBuf,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mealdb_base_url: MEALDB_BASE_URL.to_string(),
            assistant_enabled: true,
            assistant_api_key_env_var: DEFAULT_API_KEY_ENV_VAR.to_string(),
            assistant_base_url: OPENROUTER_BASE_URL.to_string(),
            assistant_model: DEFAULT_MODEL.to_string(),
            shopping_list_path: PathBuf::from("shopping_list.json"),
            log_filter: "info".to_string(),
        }
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidValue(
            name.to_string(),
            format!("'{}' is not a boolean", other),
        )),
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenv::dotenv().ok();
        }
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let assistant_enabled = match lookup("ASSISTANT_ENABLED") {
            Some(value) => parse_flag("ASSISTANT_ENABLED", &value)?,
            None => defaults.assistant_enabled,
        };

        Ok(Self {
            mealdb_base_url: lookup("MEALDB_BASE_URL").unwrap_or(defaults.mealdb_base_url),
            assistant_enabled,
            assistant_api_key_env_var: lookup("ASSISTANT_API_KEY_ENV")
                .unwrap_or(defaults.assistant_api_key_env_var),
            assistant_base_url: lookup("ASSISTANT_BASE_URL").unwrap_or(defaults.assistant_base_url),
            assistant_model: lookup("ASSISTANT_MODEL").unwrap_or(defaults.assistant_model),
            shopping_list_path: lookup("SHOPPING_LIST_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.shopping_list_path),
            log_filter: lookup("RUST_LOG").unwrap_or(defaults.log_filter),
        })
    }

    pub fn recipe_client(&self) -> MealDbClient {
        MealDbClient::new(&self.mealdb_base_url)
    }

    pub fn assistant(&self) -> Arc<dyn AssistantBackend> {
        if !self.assistant_enabled {
            return Arc::new(DisabledAssistant);
        }
        let provider = Provider::openrouter(&self.assistant_api_key_env_var)
            .with_base_url(&self.assistant_base_url)
            .with_model(&self.assistant_model);
        Arc::new(LlmAssistant::new(provider))
    }

    pub fn shopping_list_storage(&self) -> FileStorage {
        FileStorage::new(&self.shopping_list_path)
    }
}
