use serde::{Deserialize, Serialize};

use crate::mealdb::models::{Meal, INGREDIENT_SLOTS};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Ingredient {
    pub ingredient: String,
    pub measure: String,
}

/// A fully looked-up recipe with its ingredient slots flattened in order.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub category: String,
    pub area: String,
    pub instructions: String,
    pub thumbnail: String,
    pub video_link: Option<String>,
    pub source_link: Option<String>,
    pub tags: Vec<String>,
    pub ingredients: Vec<Ingredient>,
}

/// Walks slots 1..=20, dropping blank ingredients and trimming what remains.
/// A missing measure becomes an empty string.
pub fn extract_ingredients(meal: &Meal) -> Vec<Ingredient> {
    (1..=INGREDIENT_SLOTS)
        .filter_map(|slot| {
            let ingredient = meal.ingredient_slot(slot)?.trim();
            if ingredient.is_empty() {
                return None;
            }
            Some(Ingredient {
                ingredient: ingredient.to_string(),
                measure: meal.measure_slot(slot).unwrap_or_default().trim().to_string(),
            })
        })
        .collect()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl From<Meal> for Recipe {
    fn from(meal: Meal) -> Self {
        let ingredients = extract_ingredients(&meal);
        let tags = meal
            .str_tags
            .as_deref()
            .map(|tags| {
                tags.split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Recipe {
            id: meal.id_meal,
            name: meal.str_meal,
            category: meal.str_category.unwrap_or_default(),
            area: meal.str_area.unwrap_or_default(),
            instructions: meal.str_instructions.unwrap_or_default(),
            thumbnail: meal.str_meal_thumb.unwrap_or_default(),
            video_link: non_blank(meal.str_youtube),
            source_link: non_blank(meal.str_source),
            tags,
            ingredients,
        }
    }
}

impl Recipe {
    /// Instruction text split into steps on line breaks, blank lines dropped.
    pub fn instruction_steps(&self) -> Vec<String> {
        self.instructions
            .lines()
            .map(str::trim)
            .filter(|step| !step.is_empty())
            .map(str::to_string)
            .collect()
    }
}
