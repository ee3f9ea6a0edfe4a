pub mod client;
pub mod models;

pub use client::{MealDbClient, RecipeSource, MEALDB_BASE_URL};
pub use models::{Category, Meal, RecipeSummary};
