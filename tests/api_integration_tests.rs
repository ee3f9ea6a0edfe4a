mod common;

use serde_json::json;
use std::env;
use std::sync::Arc;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{completion_body, meal_json};
use meal_finder::api_connection::endpoints::ChatCompletionRequest;
use meal_finder::api_connection::{ApiConnectionError, ChatMessage, Provider};
use meal_finder::assistant::intent::{intent_json_schema, IntentResponse};
use meal_finder::assistant::{Intent, LlmAssistant, Suggestion, SuggestionEngine};
use meal_finder::mealdb::MealDbClient;

const TEST_API_KEY_ENV_VAR: &str = "OPENROUTER_API_KEY";

fn test_provider(server: &MockServer) -> Provider {
    Provider::openrouter("MEAL_FINDER_TEST_KEY_THAT_IS_NEVER_SET")
        .with_api_key("test-key")
        .with_base_url(server.uri())
        .with_model("test-model")
}

#[tokio::test]
async fn test_missing_api_key_error() {
    let provider = Provider::openrouter("THIS_KEY_SHOULD_NOT_EXIST_IN_ENV_ABXYZ");
    let request = ChatCompletionRequest {
        model: provider.model().to_string(),
        messages: vec![ChatMessage::user("Hello")],
        response_format: None,
        temperature: None,
        max_tokens: None,
    };
    let result = provider.call_chat_completion(request).await;
    assert!(matches!(result, Err(ApiConnectionError::MissingApiKey(_))));
    if let Err(ApiConnectionError::MissingApiKey(key_name)) = result {
        assert_eq!(key_name, "THIS_KEY_SHOULD_NOT_EXIST_IN_ENV_ABXYZ");
    }
}

#[tokio::test]
async fn test_structured_call_sends_schema_and_parses_fenced_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_string_contains("\"json_schema\""))
        .and(body_string_contains("intent_schema"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": "```json\n{\"type\":\"category\",\"keyword\":\"Seafood\",\"thinking\":\"fish\"}\n```"
                }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response: IntentResponse = test_provider(&server)
        .call_structured(vec![ChatMessage::user("fish")], intent_json_schema(), 100)
        .await
        .expect("structured call should succeed");
    assert_eq!(response.kind, "category");
    assert_eq!(response.keyword.as_deref(), Some("Seafood"));
}

#[tokio::test]
async fn test_api_error_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .mount(&server)
        .await;

    let result = test_provider(&server)
        .call_structured::<IntentResponse>(vec![ChatMessage::user("x")], intent_json_schema(), 100)
        .await;
    match result {
        Err(ApiConnectionError::ApiError { status, error_body }) => {
            assert_eq!(status, reqwest::StatusCode::UNAUTHORIZED);
            assert_eq!(error_body, "bad key");
        }
        other => panic!("expected ApiError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_category_request_end_to_end() {
    let assistant_server = MockServer::start().await;
    let mealdb_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("intent_schema"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(json!({
            "type": "category",
            "keyword": "Seafood",
            "thinking": "The user wants fish."
        }))))
        .expect(1)
        .mount(&assistant_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("recipe_enhancement_schema"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(json!({
            "refinedSteps": ["Heat the oven to 200C.", "Bake the fish for 15 minutes."],
            "substitutions": [{ "ingredient": "Salmon", "alternative": "Trout" }],
            "tips": ["Rest before serving."],
            "calories": 480,
            "dietaryInfo": { "vegan": false, "keto": true, "glutenFree": true, "dairyFree": true },
            "allergens": ["Fish"]
        }))))
        .expect(1)
        .mount(&assistant_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/filter.php"))
        .and(query_param("c", "Seafood"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meals": [
                { "idMeal": "100", "strMeal": "Baked salmon", "strMealThumb": "a.jpg" },
                { "idMeal": "101", "strMeal": "Fish pie", "strMealThumb": "b.jpg" },
                { "idMeal": "102", "strMeal": "Kedgeree", "strMealThumb": "c.jpg" }
            ]
        })))
        .expect(1)
        .mount(&mealdb_server)
        .await;
    for (id, name) in [("100", "Baked salmon"), ("101", "Fish pie"), ("102", "Kedgeree")] {
        Mock::given(method("GET"))
            .and(path("/lookup.php"))
            .and(query_param("i", id))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "meals": [meal_json(id, name)]
            })))
            .mount(&mealdb_server)
            .await;
    }

    let engine = SuggestionEngine::new(
        Arc::new(MealDbClient::new(mealdb_server.uri())),
        Arc::new(LlmAssistant::new(test_provider(&assistant_server))),
    );

    let Some(Suggestion::Recipe(s)) = engine.get_suggestion("I fancy some seafood").await else {
        panic!("expected a recipe suggestion");
    };

    let lookups: Vec<String> = mealdb_server
        .received_requests()
        .await
        .expect("request recording is enabled")
        .into_iter()
        .filter(|request| request.url.path() == "/lookup.php")
        .filter_map(|request| {
            request
                .url
                .query_pairs()
                .find(|(key, _)| key == "i")
                .map(|(_, value)| value.into_owned())
        })
        .collect();
    assert_eq!(lookups.len(), 1);
    assert_eq!(lookups[0], s.recipe_id);
    assert!(["100", "101", "102"].contains(&s.recipe_id.as_str()));
    assert_eq!(s.instructions.len(), 2);
    assert_eq!(s.calories, Some(480));
    assert_eq!(s.dietary_info.and_then(|d| d.keto), Some(true));
    assert_eq!(s.allergens, Some(vec!["Fish".to_string()]));
}

#[tokio::test]
async fn test_enhancement_failure_keeps_suggestion() {
    let assistant_server = MockServer::start().await;
    let mealdb_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("intent_schema"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(json!({
            "type": "search",
            "keyword": "salmon",
            "thinking": "A specific dish."
        }))))
        .mount(&assistant_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("recipe_enhancement_schema"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&assistant_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search.php"))
        .and(query_param("s", "salmon"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meals": [meal_json("7", "Salmon bake"), meal_json("8", "Salmon salad")]
        })))
        .mount(&mealdb_server)
        .await;

    let engine = SuggestionEngine::new(
        Arc::new(MealDbClient::new(mealdb_server.uri())),
        Arc::new(LlmAssistant::new(test_provider(&assistant_server))),
    );

    let Some(Suggestion::Recipe(s)) = engine.get_suggestion("salmon").await else {
        panic!("expected a recipe suggestion");
    };
    assert_eq!(s.recipe_name, "Salmon bake");
    assert_eq!(s.instructions, vec!["Heat the oven.", "Bake the fish."]);
    assert!(!s.is_enhanced());
}

#[tokio::test]
async fn test_garbage_classification_uses_heuristic() {
    let assistant_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(json!("not an intent"))))
        .mount(&assistant_server)
        .await;

    let assistant = LlmAssistant::new(test_provider(&assistant_server));
    let resolved = meal_finder::assistant::resolve_intent(&assistant, "Weekly keto plan").await;
    assert_eq!(resolved.intent, Intent::Plan("Weekly keto plan".to_string()));
    assert_eq!(resolved.thinking, None);
}

#[tokio::test]
#[ignore]
async fn test_live_intent_classification() {
    dotenv::dotenv().ok();
    if env::var(TEST_API_KEY_ENV_VAR).is_err() {
        println!(
            "Skipping test_live_intent_classification: {} not set.",
            TEST_API_KEY_ENV_VAR
        );
        return;
    }

    let assistant = LlmAssistant::new(Provider::openrouter(TEST_API_KEY_ENV_VAR));
    let resolved = meal_finder::assistant::resolve_intent(&assistant, "Seafood").await;
    assert!(resolved.thinking.is_some(), "classifier should have answered");
    assert_eq!(resolved.intent, Intent::Category("Seafood".to_string()));
}
