use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::warn;

use super::models::{CategoriesResponse, Category, Meal, MealsResponse, RecipeSummary};
use crate::recipe::Recipe;

pub const MEALDB_BASE_URL: &str = "https://www.themealdb.com/api/json/v1/1";

/// Read-only recipe lookups. Implementations swallow transport and parse
/// failures and report them as "nothing found".
#[async_trait]
pub trait RecipeSource: Send + Sync {
    async fn random_recipe(&self) -> Option<Recipe>;
    async fn search_by_name(&self, name: &str) -> Vec<Recipe>;
    async fn categories(&self) -> Vec<Category>;
    async fn filter_by_category(&self, category: &str) -> Vec<RecipeSummary>;
    async fn lookup_by_id(&self, id: &str) -> Option<Recipe>;

    /// Home page data: a random recipe and the first `category_limit`
    /// categories, fetched concurrently.
    async fn featured(&self, category_limit: usize) -> (Option<Recipe>, Vec<Category>) {
        let (recipe, mut categories) = tokio::join!(self.random_recipe(), self.categories());
        categories.truncate(category_limit);
        (recipe, categories)
    }
}

#[derive(Clone, Debug)]
pub struct MealDbClient {
    client: Client,
    base_url: String,
}

impl Default for MealDbClient {
    fn default() -> Self {
        Self::new(MEALDB_BASE_URL)
    }
}

impl MealDbClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<T, reqwest::Error> {
        self.client
            .get(format!("{}/{}", self.base_url, endpoint))
            .query(query)
            .send()
            .await?
            .error_for_status()?
            .json::<T>()
            .await
    }

    async fn meals(&self, endpoint: &str, query: &[(&str, &str)]) -> Vec<Meal> {
        match self.get_json::<MealsResponse<Meal>>(endpoint, query).await {
            Ok(response) => response.meals.unwrap_or_default(),
            Err(e) => {
                warn!(endpoint, error = %e, "recipe database request failed");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl RecipeSource for MealDbClient {
    async fn random_recipe(&self) -> Option<Recipe> {
        self.meals("random.php", &[])
            .await
            .into_iter()
            .next()
            .map(Recipe::from)
    }

    async fn search_by_name(&self, name: &str) -> Vec<Recipe> {
        self.meals("search.php", &[("s", name)])
            .await
            .into_iter()
            .map(Recipe::from)
            .collect()
    }

    async fn categories(&self) -> Vec<Category> {
        match self.get_json::<CategoriesResponse>("categories.php", &[]).await {
            Ok(response) => response.categories.unwrap_or_default(),
            Err(e) => {
                warn!(endpoint = "categories.php", error = %e, "recipe database request failed");
                Vec::new()
            }
        }
    }

    async fn filter_by_category(&self, category: &str) -> Vec<RecipeSummary> {
        match self
            .get_json::<MealsResponse<RecipeSummary>>("filter.php", &[("c", category)])
            .await
        {
            Ok(response) => response.meals.unwrap_or_default(),
            Err(e) => {
                warn!(endpoint = "filter.php", category, error = %e, "recipe database request failed");
                Vec::new()
            }
        }
    }

    async fn lookup_by_id(&self, id: &str) -> Option<Recipe> {
        self.meals("lookup.php", &[("i", id)])
            .await
            .into_iter()
            .next()
            .map(Recipe::from)
    }
}
