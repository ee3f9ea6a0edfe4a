use serde::{Deserialize, Serialize};

use super::fallback::with_fallback;
use super::AssistantBackend;
use crate::api_connection::{ApiConnectionError, JsonSchema, JsonSchemaDefinition};

pub const PLAN_DAYS: usize = 7;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DayPlan {
    pub day: String,
    pub breakfast: String,
    pub lunch: String,
    pub dinner: String,
    pub calories: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MealPlan {
    pub meal_plan: Vec<DayPlan>,
    #[serde(default)]
    pub shopping_list: Vec<String>,
}

impl MealPlan {
    /// A plan must cover exactly seven named days.
    pub fn validate(self) -> Result<Self, ApiConnectionError> {
        if self.meal_plan.len() != PLAN_DAYS {
            return Err(ApiConnectionError::InvalidPayload(format!(
                "meal plan has {} days, expected {}",
                self.meal_plan.len(),
                PLAN_DAYS
            )));
        }
        if self.meal_plan.iter().any(|d| d.day.trim().is_empty()) {
            return Err(ApiConnectionError::InvalidPayload(
                "meal plan contains an unnamed day".to_string(),
            ));
        }
        Ok(self)
    }

    pub fn total_calories(&self) -> u32 {
        self.meal_plan.iter().map(|d| d.calories).sum()
    }
}

fn day(day: &str, breakfast: &str, lunch: &str, dinner: &str, calories: u32) -> DayPlan {
    DayPlan {
        day: day.to_string(),
        breakfast: breakfast.to_string(),
        lunch: lunch.to_string(),
        dinner: dinner.to_string(),
        calories,
    }
}

/// Built-in plan returned when the planner is unreachable.
pub fn fallback_plan() -> MealPlan {
    MealPlan {
        meal_plan: vec![
            day("Monday", "Oatmeal with berries", "Grilled chicken salad", "Salmon with roasted vegetables", 1800),
            day("Tuesday", "Greek yogurt with honey", "Lentil soup", "Beef stir-fry with rice", 1850),
            day("Wednesday", "Scrambled eggs on toast", "Quinoa bowl", "Vegetable pasta", 1750),
            day("Thursday", "Banana smoothie", "Tuna wrap", "Chicken curry with rice", 1900),
            day("Friday", "Avocado toast", "Caprese sandwich", "Baked cod with potatoes", 1800),
            day("Saturday", "Pancakes with fruit", "Chicken Caesar salad", "Homemade pizza", 2100),
            day("Sunday", "Vegetable omelette", "Minestrone soup", "Roast lamb with greens", 2000),
        ],
        shopping_list: [
            "Oats", "Berries", "Greek yogurt", "Eggs", "Bread", "Chicken breast", "Salmon",
            "Cod", "Beef", "Lentils", "Quinoa", "Rice", "Pasta", "Mixed vegetables", "Potatoes",
            "Avocado", "Bananas", "Tomatoes", "Mozzarella", "Lettuce",
        ]
        .iter()
        .map(|item| item.to_string())
        .collect(),
    }
}

/// Plans are terminal: a failed call yields [`fallback_plan`], never an error.
pub async fn generate_plan(assistant: &dyn AssistantBackend, preferences: &str) -> MealPlan {
    with_fallback(
        "generate_meal_plan",
        async {
            assistant
                .generate_meal_plan(preferences)
                .await
                .and_then(MealPlan::validate)
        },
        fallback_plan,
    )
    .await
}

pub const PLAN_SYSTEM_PROMPT: &str = "You are an AI nutrition planner. Generate a 7-day meal plan, Monday through Sunday, based on the user's preferences.
Each day lists a breakfast, a lunch, a dinner and the total calories for the day.
Also return a flat shopping list of the items needed for the whole week.
Respond ONLY with a JSON object matching the provided schema.";

pub fn plan_user_prompt(preferences: &str) -> String {
    format!("Preferences: {}", preferences)
}

pub fn meal_plan_json_schema() -> JsonSchemaDefinition {
    let day = JsonSchema::object(vec![
        ("day", JsonSchema::string("Day of the week.")),
        ("breakfast", JsonSchema::string("Breakfast dish.")),
        ("lunch", JsonSchema::string("Lunch dish.")),
        ("dinner", JsonSchema::string("Dinner dish.")),
        ("calories", JsonSchema::integer("Total calories for the day.")),
    ]);

    JsonSchemaDefinition {
        name: "meal_plan_schema".to_string(),
        strict: Some(true),
        schema: JsonSchema::object(vec![
            ("mealPlan", JsonSchema::array(day, "Exactly seven days.")),
            (
                "shoppingList",
                JsonSchema::array(JsonSchema::string("One item."), "Items to buy for the week."),
            ),
        ]),
    }
}
