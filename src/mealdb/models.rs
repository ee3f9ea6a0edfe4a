use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Number of ingredient/measure slots on a TheMealDB record.
pub const INGREDIENT_SLOTS: usize = 20;

/// A full meal record as TheMealDB returns it. The numbered
/// `strIngredientN` / `strMeasureN` slots land in `slots`.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub id_meal: String,
    pub str_meal: String,
    #[serde(default)]
    pub str_category: Option<String>,
    #[serde(default)]
    pub str_area: Option<String>,
    #[serde(default)]
    pub str_instructions: Option<String>,
    #[serde(default)]
    pub str_meal_thumb: Option<String>,
    #[serde(default)]
    pub str_tags: Option<String>,
    #[serde(default)]
    pub str_youtube: Option<String>,
    #[serde(default)]
    pub str_source: Option<String>,
    #[serde(flatten)]
    pub slots: HashMap<String, Value>,
}

impl Meal {
    fn slot(&self, prefix: &str, index: usize) -> Option<&str> {
        self.slots
            .get(&format!("{}{}", prefix, index))
            .and_then(Value::as_str)
    }

    pub fn ingredient_slot(&self, index: usize) -> Option<&str> {
        self.slot("strIngredient", index)
    }

    pub fn measure_slot(&self, index: usize) -> Option<&str> {
        self.slot("strMeasure", index)
    }
}

/// Abbreviated record returned by `filter.php`. Carries no ingredients or
/// instructions; look the id up before using it as a recipe.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RecipeSummary {
    #[serde(rename = "idMeal")]
    pub id: String,
    #[serde(rename = "strMeal")]
    pub name: String,
    #[serde(rename = "strMealThumb", default)]
    pub thumbnail: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Category {
    #[serde(rename = "idCategory")]
    pub id: String,
    #[serde(rename = "strCategory")]
    pub name: String,
    #[serde(rename = "strCategoryThumb", default)]
    pub thumbnail: String,
    #[serde(rename = "strCategoryDescription", default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MealsResponse<T> {
    pub meals: Option<Vec<T>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CategoriesResponse {
    pub categories: Option<Vec<Category>>,
}
