use rand::seq::SliceRandom;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use super::enhance::{enhance_suggestion, RecipeSuggestion};
use super::intent::{resolve_intent, Intent};
use super::planner::{generate_plan, MealPlan};
use super::AssistantBackend;
use crate::mealdb::RecipeSource;
use crate::recipe::Recipe;

/// The two things the assistant can hand back.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "kind", content = "data", rename_all = "lowercase")]
pub enum Suggestion {
    Recipe(RecipeSuggestion),
    Plan(MealPlan),
}

/// Turns free text into a recipe suggestion or a meal plan.
#[derive(Clone)]
pub struct SuggestionEngine {
    recipes: Arc<dyn RecipeSource>,
    assistant: Arc<dyn AssistantBackend>,
}

impl SuggestionEngine {
    pub fn new(recipes: Arc<dyn RecipeSource>, assistant: Arc<dyn AssistantBackend>) -> Self {
        Self { recipes, assistant }
    }

    /// `None` means nothing matched; it is not an error.
    pub async fn get_suggestion(&self, query: &str) -> Option<Suggestion> {
        let resolved = resolve_intent(self.assistant.as_ref(), query).await;
        info!(intent = ?resolved.intent, thinking = ?resolved.thinking, "resolved intent");

        let recipe = match resolved.intent {
            Intent::Plan(preferences) => {
                let plan = generate_plan(self.assistant.as_ref(), &preferences).await;
                return Some(Suggestion::Plan(plan));
            }
            Intent::Random => self.recipes.random_recipe().await,
            Intent::Category(category) => self.pick_from_category(&category).await,
            Intent::Search(keyword) => self.recipes.search_by_name(&keyword).await.into_iter().next(),
            Intent::None => None,
        };

        let Some(recipe) = recipe else {
            info!(query, "no recipe found");
            return None;
        };

        let mut suggestion = RecipeSuggestion::from(&recipe);
        enhance_suggestion(self.assistant.as_ref(), &mut suggestion).await;
        debug!(recipe = %suggestion.recipe_name, enhanced = suggestion.is_enhanced(), "suggestion ready");
        Some(Suggestion::Recipe(suggestion))
    }

    /// Category listings are abbreviated, so the chosen entry is looked up in full.
    async fn pick_from_category(&self, category: &str) -> Option<Recipe> {
        let summaries = self.recipes.filter_by_category(category).await;
        let id = summaries.choose(&mut rand::thread_rng())?.id.clone();
        self.recipes.lookup_by_id(&id).await
    }
}
