use serde::{Deserialize, Serialize};

use super::fallback::with_fallback;
use super::AssistantBackend;
use crate::api_connection::{ApiConnectionError, JsonSchema, JsonSchemaDefinition};

/// Categories the classifier may map a request onto.
pub const SUPPORTED_CATEGORIES: &[&str] = &[
    "Beef",
    "Chicken",
    "Dessert",
    "Lamb",
    "Miscellaneous",
    "Pasta",
    "Pork",
    "Seafood",
    "Side",
    "Starter",
    "Vegan",
    "Vegetarian",
    "Breakfast",
    "Goat",
];

const INTENT_KINDS: &[&str] = &["search", "category", "random", "plan", "none"];

/// What the user asked for.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "type", content = "keyword", rename_all = "lowercase")]
pub enum Intent {
    Search(String),
    Category(String),
    Random,
    /// Carries the user's planning preferences.
    Plan(String),
    None,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ResolvedIntent {
    #[serde(flatten)]
    pub intent: Intent,
    pub thinking: Option<String>,
}

/// Classifier wire shape.
#[derive(Debug, Deserialize, Clone)]
pub struct IntentResponse {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub thinking: Option<String>,
}

impl TryFrom<IntentResponse> for ResolvedIntent {
    type Error = ApiConnectionError;

    fn try_from(response: IntentResponse) -> Result<Self, Self::Error> {
        let keyword = response
            .keyword
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        let require_keyword = |keyword: Option<String>| {
            keyword.ok_or_else(|| {
                ApiConnectionError::InvalidPayload(format!(
                    "intent '{}' without a keyword",
                    response.kind
                ))
            })
        };

        let intent = match response.kind.to_ascii_lowercase().as_str() {
            "search" => Intent::Search(require_keyword(keyword)?),
            "category" => Intent::Category(require_keyword(keyword)?),
            "plan" => Intent::Plan(require_keyword(keyword)?),
            "random" => Intent::Random,
            "none" => Intent::None,
            other => {
                return Err(ApiConnectionError::InvalidPayload(format!(
                    "unknown intent type '{}'",
                    other
                )))
            }
        };

        Ok(ResolvedIntent {
            intent,
            thinking: response.thinking,
        })
    }
}

/// Keyword heuristic used whenever the classifier is unavailable. It never
/// detects categories.
pub fn heuristic_intent(query: &str) -> ResolvedIntent {
    let lowered = query.to_lowercase();
    let intent = if lowered.contains("plan") || lowered.contains("schedule") {
        Intent::Plan(query.to_string())
    } else if lowered.contains("random") {
        Intent::Random
    } else {
        Intent::Search(query.to_string())
    };
    ResolvedIntent {
        intent,
        thinking: None,
    }
}

/// Asks the backend once; falls back to [`heuristic_intent`] on any failure.
pub async fn resolve_intent(assistant: &dyn AssistantBackend, query: &str) -> ResolvedIntent {
    with_fallback("classify_intent", assistant.classify_intent(query), || {
        heuristic_intent(query)
    })
    .await
}

pub fn intent_system_prompt() -> String {
    format!(
        "You are a helper for a Recipe Finder app. Your job is to interpret the user's request and map it to one of the following actions:
1. \"search\": the user asks for a specific dish (e.g. \"Lasagne\", \"Cake\", \"something with chicken\").
2. \"category\": the user asks for a type of food (e.g. \"Vegetarian\", \"Seafood\", \"Breakfast\").
3. \"random\": the user asks for a random suggestion.
4. \"plan\": the user asks for a meal plan (e.g. \"Plan my meals\", \"Weekly keto plan\").
5. \"none\": the request is unrelated to food.

Supported Categories: {}.
If the user asks for a category not in the list (e.g. \"Dinner\"), map it to \"search\" with a relevant keyword or to \"random\".
For \"plan\", the keyword must contain the user's preferences (e.g. \"keto\", \"vegetarian\", \"1500 cal\").
For \"random\" and \"none\", use an empty keyword.
Respond ONLY with a JSON object matching the provided schema.",
        SUPPORTED_CATEGORIES.join(", ")
    )
}

pub fn intent_json_schema() -> JsonSchemaDefinition {
    JsonSchemaDefinition {
        name: "intent_schema".to_string(),
        strict: Some(true),
        schema: JsonSchema::object(vec![
            (
                "type",
                JsonSchema::string_enum(INTENT_KINDS, "The action to take."),
            ),
            (
                "keyword",
                JsonSchema::string(
                    "The search term or category name to use with the recipe database, or the preferences for the planner.",
                ),
            ),
            (
                "thinking",
                JsonSchema::string("Brief explanation of why this action was chosen."),
            ),
        ]),
    }
}
