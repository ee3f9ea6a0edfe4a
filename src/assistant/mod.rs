pub mod enhance;
pub mod fallback;
pub mod intent;
pub mod planner;
pub mod suggestion;

use async_trait::async_trait;

use crate::api_connection::{ApiConnectionError, ChatMessage, Provider};
use enhance::{
    enhance_user_prompt, enhancement_json_schema, Enhancement, EnhancementRequest,
    ENHANCE_SYSTEM_PROMPT,
};
use intent::{intent_json_schema, intent_system_prompt, IntentResponse, ResolvedIntent};
use planner::{meal_plan_json_schema, plan_user_prompt, MealPlan, PLAN_SYSTEM_PROMPT};

pub use enhance::RecipeSuggestion;
pub use fallback::with_fallback;
pub use intent::{heuristic_intent, resolve_intent, Intent};
pub use planner::fallback_plan;
pub use suggestion::{Suggestion, SuggestionEngine};

/// The three remote assistant operations. Callers never see these errors
/// directly; they go through [`with_fallback`].
#[async_trait]
pub trait AssistantBackend: Send + Sync {
    async fn classify_intent(&self, query: &str) -> Result<ResolvedIntent, ApiConnectionError>;
    async fn enhance_recipe(
        &self,
        request: &EnhancementRequest,
    ) -> Result<Enhancement, ApiConnectionError>;
    async fn generate_meal_plan(&self, preferences: &str) -> Result<MealPlan, ApiConnectionError>;
}

/// Assistant backed by a chat-completion provider with structured output.
#[derive(Clone, Debug)]
pub struct LlmAssistant {
    provider: Provider,
}

impl LlmAssistant {
    pub fn new(provider: Provider) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl AssistantBackend for LlmAssistant {
    async fn classify_intent(&self, query: &str) -> Result<ResolvedIntent, ApiConnectionError> {
        let response: IntentResponse = self
            .provider
            .call_structured(
                vec![ChatMessage::system(intent_system_prompt()), ChatMessage::user(query)],
                intent_json_schema(),
                300,
            )
            .await?;
        ResolvedIntent::try_from(response)
    }

    async fn enhance_recipe(
        &self,
        request: &EnhancementRequest,
    ) -> Result<Enhancement, ApiConnectionError> {
        self.provider
            .call_structured(
                vec![
                    ChatMessage::system(ENHANCE_SYSTEM_PROMPT),
                    ChatMessage::user(enhance_user_prompt(request)),
                ],
                enhancement_json_schema(),
                1500,
            )
            .await
    }

    async fn generate_meal_plan(&self, preferences: &str) -> Result<MealPlan, ApiConnectionError> {
        self.provider
            .call_structured(
                vec![
                    ChatMessage::system(PLAN_SYSTEM_PROMPT),
                    ChatMessage::user(plan_user_prompt(preferences)),
                ],
                meal_plan_json_schema(),
                2048,
            )
            .await
    }
}

/// Stand-in used when the assistant feature flag is off.
#[derive(Clone, Copy, Debug, Default)]
pub struct DisabledAssistant;

#[async_trait]
impl AssistantBackend for DisabledAssistant {
    async fn classify_intent(&self, _query: &str) -> Result<ResolvedIntent, ApiConnectionError> {
        Err(ApiConnectionError::Disabled)
    }

    async fn enhance_recipe(
        &self,
        _request: &EnhancementRequest,
    ) -> Result<Enhancement, ApiConnectionError> {
        Err(ApiConnectionError::Disabled)
    }

    async fn generate_meal_plan(&self, _preferences: &str) -> Result<MealPlan, ApiConnectionError> {
        Err(ApiConnectionError::Disabled)
    }
}
