use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::fallback::with_fallback;
use super::AssistantBackend;
use crate::api_connection::{JsonSchema, JsonSchemaDefinition};
use crate::recipe::Recipe;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SuggestedIngredient {
    pub name: String,
    pub amount: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Substitution {
    pub ingredient: String,
    pub alternative: String,
}

/// Dietary suitability. `None` means the assistant did not say.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DietaryInfo {
    pub vegan: Option<bool>,
    pub keto: Option<bool>,
    pub gluten_free: Option<bool>,
    pub dairy_free: Option<bool>,
}

/// A recipe as shown by the assistant, plus whatever enhancement data came back.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSuggestion {
    pub recipe_id: String,
    pub recipe_name: String,
    pub category: String,
    pub area: String,
    pub ingredients: Vec<SuggestedIngredient>,
    pub instructions: Vec<String>,
    pub video_link: Option<String>,
    pub image: Option<String>,
    pub substitutions: Option<Vec<Substitution>>,
    pub tips: Option<Vec<String>>,
    pub calories: Option<u32>,
    pub dietary_info: Option<DietaryInfo>,
    pub allergens: Option<Vec<String>>,
}

impl From<&Recipe> for RecipeSuggestion {
    fn from(recipe: &Recipe) -> Self {
        RecipeSuggestion {
            recipe_id: recipe.id.clone(),
            recipe_name: recipe.name.clone(),
            category: recipe.category.clone(),
            area: recipe.area.clone(),
            ingredients: recipe
                .ingredients
                .iter()
                .map(|i| SuggestedIngredient {
                    name: i.ingredient.clone(),
                    amount: i.measure.clone(),
                })
                .collect(),
            instructions: recipe.instruction_steps(),
            video_link: recipe.video_link.clone(),
            image: Some(recipe.thumbnail.clone()).filter(|t| !t.is_empty()),
            substitutions: None,
            tips: None,
            calories: None,
            dietary_info: None,
            allergens: None,
        }
    }
}

/// What the enhancement call is given about a recipe.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnhancementRequest {
    pub recipe_name: String,
    /// "amount name" strings.
    pub ingredients: Vec<String>,
    pub instructions: String,
}

impl From<&RecipeSuggestion> for EnhancementRequest {
    fn from(suggestion: &RecipeSuggestion) -> Self {
        EnhancementRequest {
            recipe_name: suggestion.recipe_name.clone(),
            ingredients: suggestion
                .ingredients
                .iter()
                .map(|i| format!("{} {}", i.amount, i.name).trim().to_string())
                .collect(),
            instructions: suggestion.instructions.join("\n"),
        }
    }
}

/// Enhancement wire shape; every field is optional.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Enhancement {
    #[serde(default)]
    pub refined_steps: Option<Vec<String>>,
    #[serde(default)]
    pub substitutions: Option<Vec<Substitution>>,
    #[serde(default)]
    pub tips: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_calories")]
    pub calories: Option<u32>,
    #[serde(default)]
    pub dietary_info: Option<DietaryInfo>,
    #[serde(default)]
    pub allergens: Option<Vec<String>>,
}

/// Accepts any JSON number (or numeric string) and rounds it; negative or
/// non-numeric values become `None` instead of failing the whole payload.
fn lenient_calories<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let number = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(number
        .filter(|n| n.is_finite() && *n >= 0.0)
        .map(|n| n.round().min(u32::MAX as f64) as u32))
}

impl RecipeSuggestion {
    /// Refined steps replace the instructions only when non-empty; every other
    /// field overwrites only when present.
    pub fn apply_enhancement(&mut self, enhancement: Enhancement) {
        if let Some(steps) = enhancement.refined_steps.filter(|s| !s.is_empty()) {
            self.instructions = steps;
        }
        if enhancement.substitutions.is_some() {
            self.substitutions = enhancement.substitutions;
        }
        if enhancement.tips.is_some() {
            self.tips = enhancement.tips;
        }
        if enhancement.calories.is_some() {
            self.calories = enhancement.calories;
        }
        if enhancement.dietary_info.is_some() {
            self.dietary_info = enhancement.dietary_info;
        }
        if enhancement.allergens.is_some() {
            self.allergens = enhancement.allergens;
        }
    }

    pub fn is_enhanced(&self) -> bool {
        self.substitutions.is_some()
            || self.tips.is_some()
            || self.calories.is_some()
            || self.dietary_info.is_some()
            || self.allergens.is_some()
    }
}

/// Enhances `suggestion` in place; a failed call leaves it untouched.
pub async fn enhance_suggestion(assistant: &dyn AssistantBackend, suggestion: &mut RecipeSuggestion) {
    let request = EnhancementRequest::from(&*suggestion);
    let enhancement = with_fallback(
        "enhance_recipe",
        assistant.enhance_recipe(&request),
        Enhancement::default,
    )
    .await;
    suggestion.apply_enhancement(enhancement);
}

pub const ENHANCE_SYSTEM_PROMPT: &str = "You are an expert chef assistant. I will provide a recipe. Your job is to:
1. Provide 3-5 substitutions for ingredients with dietary restrictions in mind (e.g. vegan, gluten-free).
2. Provide 2-3 pro cooking tips for this specific dish.
3. Refine the cooking instructions if they are unclear or poorly formatted.
4. Estimate the calories per serving (integer).
5. Determine dietary suitability (vegan, keto, glutenFree, dairyFree) as booleans.
6. List common allergens present (e.g. Peanuts, Dairy, Gluten, Shellfish, Soy, Eggs).
Respond ONLY with a JSON object matching the provided schema.";

pub fn enhance_user_prompt(request: &EnhancementRequest) -> String {
    format!(
        "Recipe: {}\nIngredients: {}\nInstructions: {}",
        request.recipe_name,
        request.ingredients.join(", "),
        request.instructions
    )
}

pub fn enhancement_json_schema() -> JsonSchemaDefinition {
    let substitution = JsonSchema::object(vec![
        ("ingredient", JsonSchema::string("The original ingredient.")),
        ("alternative", JsonSchema::string("The substitution.")),
    ]);
    let dietary = JsonSchema::object(vec![
        ("vegan", JsonSchema::boolean("Suitable for vegans.")),
        ("keto", JsonSchema::boolean("Suitable for a keto diet.")),
        ("glutenFree", JsonSchema::boolean("Contains no gluten.")),
        ("dairyFree", JsonSchema::boolean("Contains no dairy.")),
    ]);

    JsonSchemaDefinition {
        name: "recipe_enhancement_schema".to_string(),
        strict: Some(true),
        schema: JsonSchema::object(vec![
            (
                "refinedSteps",
                JsonSchema::array(JsonSchema::string("One step."), "Refined cooking steps."),
            ),
            (
                "substitutions",
                JsonSchema::array(substitution, "Ingredient substitutions."),
            ),
            (
                "tips",
                JsonSchema::array(JsonSchema::string("One tip."), "Pro cooking tips."),
            ),
            (
                "calories",
                JsonSchema::integer("Estimated calories per serving."),
            ),
            ("dietaryInfo", dietary),
            (
                "allergens",
                JsonSchema::array(JsonSchema::string("One allergen."), "Common allergens present."),
            ),
        ]),
    }
}
