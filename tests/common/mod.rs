#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use meal_finder::api_connection::ApiConnectionError;
use meal_finder::assistant::enhance::{Enhancement, EnhancementRequest};
use meal_finder::assistant::intent::ResolvedIntent;
use meal_finder::assistant::planner::MealPlan;
use meal_finder::assistant::AssistantBackend;
use meal_finder::mealdb::{Category, RecipeSource, RecipeSummary};
use meal_finder::recipe::{Ingredient, Recipe};

pub fn meal_json(id: &str, name: &str) -> Value {
    json!({
        "idMeal": id,
        "strMeal": name,
        "strCategory": "Seafood",
        "strArea": "British",
        "strInstructions": "Heat the oven.\r\nBake the fish.",
        "strMealThumb": format!("https://example.test/{}.jpg", id),
        "strTags": "Fish,Bake",
        "strYoutube": "https://www.youtube.com/watch?v=abc",
        "strIngredient1": "Salmon",
        "strMeasure1": "2 fillets",
        "strIngredient2": "Lemon",
        "strMeasure2": "1",
        "strIngredient3": "",
        "strMeasure3": "",
        "strIngredient4": null,
        "strMeasure4": null,
        "strIngredient5": "Dill",
        "strMeasure5": "1 sprig"
    })
}

pub fn recipe(id: &str, name: &str) -> Recipe {
    Recipe {
        id: id.to_string(),
        name: name.to_string(),
        category: "Seafood".to_string(),
        area: "British".to_string(),
        instructions: "Heat the oven.\nBake the fish.".to_string(),
        thumbnail: String::new(),
        video_link: None,
        source_link: None,
        tags: vec![],
        ingredients: vec![
            Ingredient {
                ingredient: "Salmon".to_string(),
                measure: "2 fillets".to_string(),
            },
            Ingredient {
                ingredient: "Lemon".to_string(),
                measure: "1".to_string(),
            },
        ],
    }
}

/// Chat completion body whose first choice carries `content` as JSON text.
pub fn completion_body(content: Value) -> Value {
    json!({
        "id": "gen-test",
        "object": "chat.completion",
        "created": 1_700_000_000u64,
        "model": "test-model",
        "choices": [{
            "index": 0,
            "finish_reason": "stop",
            "message": { "role": "assistant", "content": content.to_string() }
        }]
    })
}

/// In-memory recipe source that counts the calls it receives.
#[derive(Default)]
pub struct FakeRecipes {
    pub random: Option<Recipe>,
    pub search_results: Vec<Recipe>,
    pub category_results: Vec<RecipeSummary>,
    pub by_id: Vec<Recipe>,
    pub lookups: AtomicUsize,
    pub searches: AtomicUsize,
}

#[async_trait]
impl RecipeSource for FakeRecipes {
    async fn random_recipe(&self) -> Option<Recipe> {
        self.random.clone()
    }

    async fn search_by_name(&self, _name: &str) -> Vec<Recipe> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        self.search_results.clone()
    }

    async fn categories(&self) -> Vec<Category> {
        Vec::new()
    }

    async fn filter_by_category(&self, _category: &str) -> Vec<RecipeSummary> {
        self.category_results.clone()
    }

    async fn lookup_by_id(&self, id: &str) -> Option<Recipe> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.by_id.iter().find(|r| r.id == id).cloned()
    }
}

/// Scripted assistant. `None` fields answer with a network-style failure.
#[derive(Default)]
pub struct FakeAssistant {
    pub intent: Option<ResolvedIntent>,
    pub enhancement: Option<Enhancement>,
    pub plan: Option<MealPlan>,
    pub enhance_calls: AtomicUsize,
}

fn unavailable() -> ApiConnectionError {
    ApiConnectionError::ApiError {
        status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
        error_body: "down".to_string(),
    }
}

#[async_trait]
impl AssistantBackend for FakeAssistant {
    async fn classify_intent(&self, _query: &str) -> Result<ResolvedIntent, ApiConnectionError> {
        self.intent.clone().ok_or_else(unavailable)
    }

    async fn enhance_recipe(
        &self,
        _request: &EnhancementRequest,
    ) -> Result<Enhancement, ApiConnectionError> {
        self.enhance_calls.fetch_add(1, Ordering::SeqCst);
        self.enhancement.clone().ok_or_else(unavailable)
    }

    async fn generate_meal_plan(&self, _preferences: &str) -> Result<MealPlan, ApiConnectionError> {
        self.plan.clone().ok_or_else(unavailable)
    }
}

pub fn shared<T>(value: T) -> Arc<T> {
    Arc::new(value)
}
