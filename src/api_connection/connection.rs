use reqwest::Client;
use serde::de::DeserializeOwned;
use std::env;
use tracing::debug;

use super::endpoints::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, JsonSchemaDefinition, Provider,
    ResponseFormat, DEFAULT_MODEL, OPENROUTER_BASE_URL,
};

#[derive(Debug, thiserror::Error)]
pub enum ApiConnectionError {
    #[error("API key not found in environment: {0}")]
    MissingApiKey(String),
    #[error("Assistant is disabled by configuration")]
    Disabled,
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("API error {status}: {error_body}")]
    ApiError {
        status: reqwest::StatusCode,
        error_body: String,
    },
    #[error("API returned no usable content")]
    EmptyResponse,
    #[error("Malformed payload: {0}")]
    InvalidPayload(String),
}

impl Provider {
    /// Builds an OpenRouter provider, reading the key from `api_key_env_var_name`.
    /// A missing key is only reported when a call is made.
    pub fn openrouter(api_key_env_var_name: &str) -> Self {
        Self::OpenRouter {
            api_key_env_var: api_key_env_var_name.to_string(),
            api_key: env::var(api_key_env_var_name).ok().filter(|k| !k.is_empty()),
            base_url: OPENROUTER_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            client: Client::new(),
        }
    }

    pub fn with_api_key(self, key: impl Into<String>) -> Self {
        match self {
            Provider::OpenRouter {
                api_key_env_var,
                base_url,
                model,
                client,
                ..
            } => Provider::OpenRouter {
                api_key_env_var,
                api_key: Some(key.into()),
                base_url,
                model,
                client,
            },
        }
    }

    pub fn with_base_url(self, url: impl Into<String>) -> Self {
        match self {
            Provider::OpenRouter {
                api_key_env_var,
                api_key,
                model,
                client,
                ..
            } => Provider::OpenRouter {
                api_key_env_var,
                api_key,
                base_url: url.into().trim_end_matches('/').to_string(),
                model,
                client,
            },
        }
    }

    pub fn with_model(self, model: impl Into<String>) -> Self {
        match self {
            Provider::OpenRouter {
                api_key_env_var,
                api_key,
                base_url,
                client,
                ..
            } => Provider::OpenRouter {
                api_key_env_var,
                api_key,
                base_url,
                model: model.into(),
                client,
            },
        }
    }

    pub fn model(&self) -> &str {
        match self {
            Provider::OpenRouter { model, .. } => model,
        }
    }

    pub async fn call_chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ApiConnectionError> {
        match self {
            Provider::OpenRouter {
                api_key_env_var,
                api_key,
                base_url,
                client,
                ..
            } => {
                let actual_api_key = api_key
                    .as_deref()
                    .ok_or_else(|| ApiConnectionError::MissingApiKey(api_key_env_var.clone()))?;

                let url = format!("{}/chat/completions", base_url);

                let site_url = env::var("SITE_URL")
                    .unwrap_or_else(|_| "http://localhost:3000".to_string());
                let app_name = env::var("APP_NAME").unwrap_or_else(|_| "MealFinder".to_string());

                let response = client
                    .post(url)
                    .bearer_auth(actual_api_key)
                    .header("HTTP-Referer", site_url)
                    .header("X-Title", app_name)
                    .json(&request)
                    .send()
                    .await?;

                if response.status().is_success() {
                    let chat_response = response.json::<ChatCompletionResponse>().await?;
                    Ok(chat_response)
                } else {
                    let status = response.status();
                    let error_body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Failed to read error body".to_string());
                    Err(ApiConnectionError::ApiError { status, error_body })
                }
            }
        }
    }

    /// Sends `messages` with a strict JSON-schema response format and decodes the
    /// first choice into `T`.
    pub async fn call_structured<T: DeserializeOwned>(
        &self,
        messages: Vec<ChatMessage>,
        schema: JsonSchemaDefinition,
        max_tokens: u32,
    ) -> Result<T, ApiConnectionError> {
        let schema_name = schema.name.clone();
        let request = ChatCompletionRequest {
            model: self.model().to_string(),
            messages,
            response_format: Some(ResponseFormat::json_schema(schema)),
            temperature: Some(0.2),
            max_tokens: Some(max_tokens),
        };

        let response = self.call_chat_completion(request).await?;
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(ApiConnectionError::EmptyResponse)?;

        debug!(schema = %schema_name, raw = %content, "structured completion received");

        let json = strip_code_fences(&content);
        if json.is_empty() {
            return Err(ApiConnectionError::EmptyResponse);
        }
        Ok(serde_json::from_str(json)?)
    }
}

/// Models sometimes wrap JSON in markdown fences even when asked not to.
pub fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    if !trimmed.ends_with("```") {
        return trimmed;
    }
    if let Some(inner) = trimmed.strip_prefix("```json") {
        inner.trim_end_matches("```").trim()
    } else if let Some(inner) = trimmed.strip_prefix("```") {
        inner.trim_end_matches("```").trim()
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
    }

    #[test]
    fn completion_response_keeps_only_choice_content() {
        let full: ChatCompletionResponse = serde_json::from_str(
            r#"{"id":"gen-1","object":"chat.completion","created":1,"model":"m",
                "choices":[{"index":0,"finish_reason":"stop",
                            "message":{"role":"assistant","content":"{}"}}],
                "usage":{"prompt_tokens":3,"total_tokens":5}}"#,
        )
        .unwrap();
        assert_eq!(full.choices[0].message.content.as_deref(), Some("{}"));

        let bare: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices":[{"message":{}}]}"#).unwrap();
        assert_eq!(bare.choices[0].message.content, None);
    }

    #[test]
    fn leaves_plain_json_alone() {
        assert_eq!(strip_code_fences("  {\"a\":1} "), "{\"a\":1}");
    }
}
