mod common;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::meal_json;
use meal_finder::mealdb::{MealDbClient, RecipeSource};

#[tokio::test]
async fn search_normalizes_meals() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search.php"))
        .and(query_param("s", "Baked salmon"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meals": [meal_json("52959", "Baked salmon with fennel & tomatoes")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = MealDbClient::new(server.uri());
    let results = client.search_by_name("Baked salmon").await;

    assert_eq!(results.len(), 1);
    let recipe = &results[0];
    assert_eq!(recipe.id, "52959");
    assert_eq!(recipe.tags, vec!["Fish", "Bake"]);
    let names: Vec<&str> = recipe.ingredients.iter().map(|i| i.ingredient.as_str()).collect();
    assert_eq!(names, vec!["Salmon", "Lemon", "Dill"]);
}

#[tokio::test]
async fn null_meals_is_an_empty_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "meals": null })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/lookup.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "meals": null })))
        .mount(&server)
        .await;

    let client = MealDbClient::new(server.uri());
    assert!(client.search_by_name("nothing").await.is_empty());
    assert_eq!(client.lookup_by_id("0").await, None);
}

#[tokio::test]
async fn server_errors_and_garbage_degrade_to_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/random.php"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/categories.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = MealDbClient::new(server.uri());
    assert_eq!(client.random_recipe().await, None);
    assert!(client.categories().await.is_empty());
}

#[tokio::test]
async fn unreachable_server_degrades_to_empty() {
    let client = MealDbClient::new("http://127.0.0.1:9");
    assert!(client.filter_by_category("Seafood").await.is_empty());
}

#[tokio::test]
async fn filter_returns_abbreviated_summaries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/filter.php"))
        .and(query_param("c", "Seafood"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meals": [
                { "idMeal": "52959", "strMeal": "Baked salmon", "strMealThumb": "a.jpg" },
                { "idMeal": "52819", "strMeal": "Cajun spiced fish tacos", "strMealThumb": "b.jpg" }
            ]
        })))
        .mount(&server)
        .await;

    let client = MealDbClient::new(server.uri());
    let summaries = client.filter_by_category("Seafood").await;
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[1].id, "52819");
    assert_eq!(summaries[0].thumbnail.as_deref(), Some("a.jpg"));
}

#[tokio::test]
async fn featured_fetches_random_and_truncated_categories() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/random.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meals": [meal_json("1", "Featured")]
        })))
        .expect(1)
        .mount(&server)
        .await;
    let categories: Vec<_> = (1..=10)
        .map(|i| {
            json!({
                "idCategory": i.to_string(),
                "strCategory": format!("Category {}", i),
                "strCategoryThumb": "",
                "strCategoryDescription": ""
            })
        })
        .collect();
    Mock::given(method("GET"))
        .and(path("/categories.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "categories": categories })))
        .expect(1)
        .mount(&server)
        .await;

    let client = MealDbClient::new(server.uri());
    let (featured, categories) = client.featured(8).await;

    assert_eq!(featured.map(|r| r.name), Some("Featured".to_string()));
    assert_eq!(categories.len(), 8);
    assert_eq!(categories[0].name, "Category 1");
}
