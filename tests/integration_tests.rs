use std::collections::HashMap;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use rstest::rstest;
use serde_json::{json, Value};
use tower::ServiceExt;
use travel_crew::{
    api::AppState,
    planner::placeholder_weather,
    tools::{
        AttractionSearchTool, FlightSearchTool, FunctionFactory, HotelSearchTool,
        WeatherForecastTool,
    },
    web, AgentRole, BudgetAllocation, Settings, Tool, TripPlanner,
};

fn settings_for(base_url: &str) -> Settings {
    let env: HashMap<&str, String> = HashMap::from([
        ("GROQ_API_KEY", "test-key".to_string()),
        ("LLM_BASE_URL", base_url.to_string()),
        ("LLM_MAX_ITERATIONS", "3".to_string()),
    ]);
    Settings::from_lookup(|key| env.get(key).cloned()).unwrap()
}

fn app_for(base_url: &str) -> Router {
    let settings = settings_for(base_url);
    web::app(AppState::new(TripPlanner::new(settings.llm)))
}

fn final_answer(answer: &str) -> String {
    json!({
        "id": "cmpl",
        "choices": [{
            "index": 0,
            "message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_final",
                    "type": "function",
                    "function": {
                        "name": "final_answer",
                        "arguments": json!({ "answer": answer }).to_string()
                    }
                }]
            },
            "finish_reason": "tool_calls"
        }],
        "usage": {"prompt_tokens": 100, "completion_tokens": 20, "total_tokens": 120}
    })
    .to_string()
}

fn plan_request(start: &str, end: &str) -> Request<Body> {
    let body = json!({
        "destination": "Paris",
        "start_date": start,
        "end_date": end,
        "budget": 3000.0,
        "preferences": ["museums", "food"],
        "travelers": 2
    });
    Request::builder()
        .method("POST")
        .uri("/api/plan")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_flight_tool() {
    let result = FlightSearchTool::new()
        .execute(json!({
            "destination": "Paris",
            "start_date": "2025-01-10",
            "end_date": "2025-01-17",
            "budget": 1200.0
        }))
        .await
        .unwrap();

    let flights = result["flights"].as_array().unwrap();
    assert_eq!(flights.len(), 3);
    assert_eq!(flights[0]["flight_number"], "AF123");
    assert!(flights
        .iter()
        .all(|flight| flight["price"].as_f64().unwrap() > 0.0));
}

#[tokio::test]
async fn test_flights_zero_budget_is_empty() {
    let result = FlightSearchTool::new()
        .execute(json!({
            "destination": "Paris",
            "start_date": "2025-01-10",
            "end_date": "2025-01-17",
            "budget": 0.0
        }))
        .await
        .unwrap();
    assert_eq!(result["flights"], json!([]));
}

#[tokio::test]
async fn test_hotel_tool_detects_early_arrival() {
    let result = HotelSearchTool::new()
        .execute(json!({
            "destination": "Paris",
            "check_in": "2025-01-10T09:30:00",
            "check_out": "2025-01-13",
            "budget_per_night": 300.0
        }))
        .await
        .unwrap();

    assert_eq!(result["early_arrival_detected"], true);
    assert_eq!(result["nights"], 3);
}

#[tokio::test]
async fn test_weather_tool() {
    let result = WeatherForecastTool::new()
        .execute(json!({
            "destination": "Paris",
            "start_date": "2025-01-10",
            "end_date": "2025-01-17"
        }))
        .await
        .unwrap();

    assert_eq!(result["forecast"]["condition"], "cold");
    assert_eq!(result["suggested_setting"], "indoor");
}

#[tokio::test]
async fn test_attractions_tool_rainy_order() {
    let result = AttractionSearchTool::new()
        .execute(json!({
            "destination": "Paris",
            "weather_condition": "rain showers"
        }))
        .await
        .unwrap();

    let attractions = result["attractions"].as_array().unwrap();
    let indoor: Vec<bool> = attractions
        .iter()
        .map(|a| a["indoor"].as_bool().unwrap())
        .collect();
    // All indoor options come before any outdoor one
    assert!(indoor.windows(2).all(|pair| pair[0] || !pair[1]));

    let indoor_costs: Vec<f64> = attractions
        .iter()
        .filter(|a| a["indoor"] == true)
        .map(|a| a["cost"].as_f64().unwrap())
        .collect();
    assert!(indoor_costs.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[tokio::test]
async fn test_function_factory() {
    let mut factory = FunctionFactory::new();
    factory.register_tool(FlightSearchTool::new());
    factory.register_tool(WeatherForecastTool::new());

    assert!(factory.has_function("search_flights"));
    assert!(factory.has_function("get_weather_forecast"));
    assert!(!factory.has_function("search_hotels"));

    let result = factory
        .execute_function(
            "get_weather_forecast",
            json!({"destination": "Paris", "start_date": "2025-07-01", "end_date": "2025-07-05"}),
        )
        .await
        .unwrap();
    assert_eq!(result["forecast"]["condition"], "warm");

    let err = factory
        .execute_function("search_hotels", json!({}))
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "TOOL_NOT_FOUND");

    let tools = factory.get_openai_tools();
    assert_eq!(tools.len(), 2);
    assert_eq!(tools[0]["type"], "function");
}

#[test]
fn test_every_role_gets_its_own_tool() {
    for role in AgentRole::ALL {
        assert_eq!(role.function_factory().tool_names().len(), 1);
    }
}

#[rstest]
#[case(3000.0, 7, 150.0)]
#[case(1000.0, 0, 350.0)]
#[case(700.0, 2, 122.5)]
fn test_budget_allocation(#[case] budget: f64, #[case] nights: i64, #[case] per_night: f64) {
    let allocation = BudgetAllocation::allocate(budget, nights);
    assert!((allocation.hotel_per_night - per_night).abs() < 1e-9);
    assert!(allocation.total() <= budget + 1e-9);
}

#[tokio::test]
async fn test_plan_endpoint_end_to_end() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer test-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(final_answer("Louvre on the rainy day, Eiffel Tower otherwise"))
        .expect(4)
        .create_async()
        .await;

    let response = app_for(&server.url())
        .oneshot(plan_request("2025-01-10", "2025-01-17"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let plan = json_body(response).await;
    mock.assert_async().await;

    assert_eq!(plan["destination"], "Paris");
    assert_eq!(plan["dates"], "2025-01-10 to 2025-01-17");
    assert_eq!(plan["weather"], serde_json::to_value(placeholder_weather()).unwrap());
    assert_eq!(plan["flights"], json!([]));
    assert_eq!(plan["hotels"], json!([]));
    assert_eq!(plan["attractions"], json!([]));
    assert_eq!(plan["total_estimated_cost"], 2550.0);
    assert_eq!(
        plan["reasoning_summary"],
        "Louvre on the rainy day, Eiffel Tower otherwise"
    );
    assert_eq!(plan["langfuse_trace_url"], Value::Null);
}

#[tokio::test]
async fn test_hotel_prompt_carries_flight_output() {
    let mut server = mockito::Server::new_async().await;

    // Only the hotel request embeds the flight task's answer as context
    let hotel_mock = server
        .mock("POST", "/chat/completions")
        .match_body(mockito::Matcher::Regex(
            r"flight_search \(Flight Search Specialist\) ---\\nAF123 lands 20:30".to_string(),
        ))
        .with_status(200)
        .with_body(final_answer("Le Marais Boutique Hotel"))
        .expect(1)
        .create_async()
        .await;

    let other_mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(final_answer("AF123 lands 20:30"))
        .expect(3)
        .create_async()
        .await;

    let response = app_for(&server.url())
        .oneshot(plan_request("2025-01-10", "2025-01-17"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    hotel_mock.assert_async().await;
    other_mock.assert_async().await;
}

#[tokio::test]
async fn test_attractions_prompt_carries_weather_output() {
    let mut server = mockito::Server::new_async().await;

    let weather_mock = server
        .mock("POST", "/chat/completions")
        .match_body(mockito::Matcher::Regex(
            "You are Weather and Packing Advisor".to_string(),
        ))
        .with_status(200)
        .with_body(final_answer("Rain all week, pack an umbrella"))
        .expect(1)
        .create_async()
        .await;

    let attractions_mock = server
        .mock("POST", "/chat/completions")
        .match_body(mockito::Matcher::Regex(
            r"weather_forecast \(Weather and Packing Advisor\) ---\\nRain all week, pack an umbrella"
                .to_string(),
        ))
        .with_status(200)
        .with_body(final_answer("Musée d'Orsay, then the Louvre"))
        .expect(1)
        .create_async()
        .await;

    let other_mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(final_answer("AF123 lands 20:30"))
        .expect(2)
        .create_async()
        .await;

    let response = app_for(&server.url())
        .oneshot(plan_request("2025-01-10", "2025-01-17"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let plan = json_body(response).await;
    weather_mock.assert_async().await;
    attractions_mock.assert_async().await;
    other_mock.assert_async().await;
    assert_eq!(plan["reasoning_summary"], "Musée d'Orsay, then the Louvre");
}

#[tokio::test]
async fn test_failure_in_last_step_discards_earlier_results() {
    let mut server = mockito::Server::new_async().await;

    let attractions_mock = server
        .mock("POST", "/chat/completions")
        .match_body(mockito::Matcher::Regex(
            "Local Activities Curator".to_string(),
        ))
        .with_status(500)
        .with_body(r#"{"error": {"message": "curator unavailable"}}"#)
        .expect(1)
        .create_async()
        .await;

    let other_mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(final_answer("AF123 lands 20:30"))
        .expect(3)
        .create_async()
        .await;

    let response = app_for(&server.url())
        .oneshot(plan_request("2025-01-10", "2025-01-17"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    attractions_mock.assert_async().await;
    other_mock.assert_async().await;

    let detail = body["detail"].as_str().unwrap();
    assert!(detail.contains("500"));
    assert!(!detail.contains("AF123"));
    assert!(body.get("reasoning_summary").is_none());
}

#[tokio::test]
async fn test_reversed_dates_are_rejected() {
    // Nothing listens here; validation must fail first
    let response = app_for("http://127.0.0.1:1")
        .oneshot(plan_request("2025-01-17", "2025-01-10"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert!(body["detail"].as_str().unwrap().contains("before start_date"));
}

#[tokio::test]
async fn test_llm_failure_returns_500_with_detail() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .with_status(500)
        .with_body(r#"{"error": {"message": "model overloaded"}}"#)
        .expect(1)
        .create_async()
        .await;

    let response = app_for(&server.url())
        .oneshot(plan_request("2025-01-10", "2025-01-17"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    mock.assert_async().await;
    assert!(body["detail"].as_str().unwrap().contains("500"));
}

#[tokio::test]
async fn test_malformed_body_is_rejected() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/plan")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"destination": "Paris"}"#))
        .unwrap();

    let response = app_for("http://127.0.0.1:1").oneshot(request).await.unwrap();
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_health_and_root() {
    let app = app_for("http://127.0.0.1:1");

    let response = app
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let health = json_body(response).await;
    assert_eq!(health["status"], "healthy");
    assert!(health["timestamp"].is_string());

    let response = app
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let root = json_body(response).await;
    assert_eq!(root["endpoints"]["plan"], "/api/plan");
    assert_eq!(root["endpoints"]["health"], "/health");
    assert!(root["version"].is_string());
}
