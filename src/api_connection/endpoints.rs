use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "meta-llama/llama-3.3-70b-instruct";

/// An OpenAI-compatible chat completion backend.
#[derive(Clone, Debug)]
pub enum Provider {
    OpenRouter {
        /// Name of the environment variable the key was read from, kept for error messages.
        api_key_env_var: String,
        api_key: Option<String>,
        base_url: String,
        model: String,
        client: reqwest::Client,
    },
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// A JSON schema node. Objects, arrays and scalars share one shape so that
/// nested structured outputs (meal plans, enhancement payloads) can be expressed.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct JsonSchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r#enum: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<HashMap<String, JsonSchema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "additionalProperties")]
    pub additional_properties: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<JsonSchema>>,
}

impl JsonSchema {
    fn scalar(schema_type: &str, description: &str) -> Self {
        Self {
            schema_type: schema_type.to_string(),
            description: Some(description.to_string()),
            ..Self::default()
        }
    }

    pub fn string(description: &str) -> Self {
        Self::scalar("string", description)
    }

    pub fn integer(description: &str) -> Self {
        Self::scalar("integer", description)
    }

    pub fn boolean(description: &str) -> Self {
        Self::scalar("boolean", description)
    }

    pub fn string_enum(values: &[&str], description: &str) -> Self {
        Self {
            r#enum: Some(values.iter().map(|v| v.to_string()).collect()),
            ..Self::scalar("string", description)
        }
    }

    pub fn array(items: JsonSchema, description: &str) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::scalar("array", description)
        }
    }

    /// Strict object: every listed property is required and nothing else is allowed.
    pub fn object(properties: Vec<(&str, JsonSchema)>) -> Self {
        let required = properties.iter().map(|(name, _)| name.to_string()).collect();
        Self {
            schema_type: "object".to_string(),
            properties: Some(
                properties
                    .into_iter()
                    .map(|(name, schema)| (name.to_string(), schema))
                    .collect(),
            ),
            required: Some(required),
            additional_properties: Some(false),
            ..Self::default()
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JsonSchemaDefinition {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
    pub schema: JsonSchema,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub format_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_schema: Option<JsonSchemaDefinition>,
}

impl ResponseFormat {
    pub fn json_schema(definition: JsonSchemaDefinition) -> Self {
        Self {
            format_type: "json_schema".to_string(),
            json_schema: Some(definition),
        }
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// Only the first choice's content is read; other response fields are ignored.
#[derive(Debug, Deserialize, Clone)]
pub struct ChatCompletionResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatCompletionChoice {
    pub message: ChatCompletionResponseMessage,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatCompletionChoice>,
}
