//! HTTP-level tests for the router using wiremock for both upstream APIs.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use skychat::assistant::prompt::FORECAST_FALLBACK;
use skychat::config::AppConfig;
use skychat::{build_router, create_http_client, AppState};
use tower::ServiceExt;
use wiremock::matchers::{any, body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GEMINI_PATH: &str = "/v1beta/models/gemini-2.0-flash:generateContent";

fn test_config(weather_url: &str, gemini_url: &str) -> AppConfig {
    let mut config = AppConfig::with_keys("owm-key", "gemini-key");
    config.weather_api_url = format!("{}/data/2.5", weather_url);
    config.gemini_api_url = format!("{}/v1beta", gemini_url);
    config.upstream_timeout_secs = 5;
    config
}

fn app(config: AppConfig) -> Router {
    let client = create_http_client(&config).unwrap();
    build_router(AppState::new(config, client))
}

async fn app_with(weather: &MockServer, gemini: &MockServer) -> Router {
    app(test_config(&weather.uri(), &gemini.uri()))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn london_current() -> Value {
    json!({
        "cod": 200,
        "name": "London",
        "main": { "temp": 15.0, "feels_like": 14.2, "humidity": 72, "pressure": 1012 },
        "weather": [{ "id": 800, "main": "Clear", "description": "clear sky", "icon": "01d" }],
        "wind": { "speed": 3.6, "deg": 240 },
        "sys": { "country": "GB", "sunrise": 1700000000, "sunset": 1700040000 },
        "timezone": 3600
    })
}

/// Two past entries followed by `future` entries 3h apart
fn forecast_around_now(future: i64) -> Value {
    let now = chrono::Utc::now().timestamp();
    let mut list = vec![now - 7200, now - 60];
    list.extend((1..=future).map(|i| now + i * 10_800));
    let list: Vec<Value> = list
        .into_iter()
        .enumerate()
        .map(|(i, dt)| {
            json!({
                "dt": dt,
                "main": { "temp": i as f64 },
                "weather": [{ "description": "light rain", "icon": "10n" }]
            })
        })
        .collect();
    json!({ "cod": "200", "message": 0, "cnt": list.len(), "list": list })
}

async fn mount_weather(server: &MockServer, current: ResponseTemplate, forecast: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "London"))
        .and(query_param("appid", "owm-key"))
        .and(query_param("units", "metric"))
        .respond_with(current)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("q", "London"))
        .and(query_param("appid", "owm-key"))
        .and(query_param("units", "metric"))
        .respond_with(forecast)
        .mount(server)
        .await;
}

async fn expect_no_calls(server: &MockServer) {
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}

fn ask_body(forecast: Value) -> Value {
    json!({
        "prompt": "Will it rain tonight?",
        "current_weather": {
            "city": "London",
            "country": "GB",
            "temperature": 15.0,
            "feels_like": 14.2,
            "humidity": 72,
            "pressure": 1012,
            "description": "clear sky",
            "icon": "http://openweathermap.org/img/wn/01d@2x.png",
            "wind_speed": 3.6,
            "sunrise": "10:13 PM",
            "sunset": "09:20 AM",
            "timezone_offset": 3600
        },
        "forecast": forecast
    })
}

fn gemini_answer(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

async fn sent_prompt(server: &MockServer) -> String {
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    body["contents"][0]["parts"][0]["text"]
        .as_str()
        .unwrap()
        .to_string()
}

// ============================================================================
// GET /weather
// ============================================================================

#[tokio::test]
async fn test_weather_success_shapes_response() {
    let weather = MockServer::start().await;
    let gemini = MockServer::start().await;
    mount_weather(
        &weather,
        ResponseTemplate::new(200).set_body_json(london_current()),
        ResponseTemplate::new(200).set_body_json(forecast_around_now(12)),
    )
    .await;

    let started = chrono::Utc::now().timestamp();
    let (status, body) = send(app_with(&weather, &gemini).await, get("/weather?city=London")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["city"], "London");
    assert_eq!(body["country"], "GB");
    assert_eq!(body["temperature"], 15.0);
    assert_eq!(body["feels_like"], 14.2);
    assert_eq!(body["humidity"], 72);
    assert_eq!(body["pressure"], 1012);
    assert_eq!(body["description"], "clear sky");
    assert_eq!(body["icon"], "http://openweathermap.org/img/wn/01d@2x.png");
    assert_eq!(body["wind_speed"], 3.6);
    assert_eq!(body["sunrise"], "10:13 PM");
    assert_eq!(body["sunset"], "09:20 AM");
    assert_eq!(body["timezone_offset"], 3600);

    let forecast = body["forecast"].as_array().unwrap();
    assert_eq!(forecast.len(), 8);
    let timestamps: Vec<i64> = forecast
        .iter()
        .map(|e| e["timestamp"].as_i64().unwrap())
        .collect();
    assert!(timestamps.iter().all(|&ts| ts > started));
    assert!(timestamps.windows(2).all(|w| w[0] < w[1]));
    // First two upstream entries are in the past
    assert_eq!(forecast[0]["temperature"], 2.0);
    assert_eq!(forecast[0]["icon"], "http://openweathermap.org/img/wn/10n@2x.png");
    assert!(forecast[0]["time"].as_str().unwrap().ends_with('M'));
}

#[tokio::test]
async fn test_weather_forecast_shorter_than_window() {
    let weather = MockServer::start().await;
    let gemini = MockServer::start().await;
    mount_weather(
        &weather,
        ResponseTemplate::new(200).set_body_json(london_current()),
        ResponseTemplate::new(200).set_body_json(forecast_around_now(3)),
    )
    .await;

    let (status, body) = send(app_with(&weather, &gemini).await, get("/weather?city=London")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["forecast"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_weather_missing_city_makes_no_upstream_call() {
    let weather = MockServer::start().await;
    let gemini = MockServer::start().await;
    expect_no_calls(&weather).await;

    let (status, body) = send(app_with(&weather, &gemini).await, get("/weather")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "City parameter is missing");
    assert_eq!(body["code"], "MISSING_PARAMETER");
    weather.verify().await;
}

#[tokio::test]
async fn test_weather_blank_city_makes_no_upstream_call() {
    let weather = MockServer::start().await;
    let gemini = MockServer::start().await;
    expect_no_calls(&weather).await;

    let (status, _) = send(app_with(&weather, &gemini).await, get("/weather?city=%20%20")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    weather.verify().await;
}

#[tokio::test]
async fn test_weather_city_not_found() {
    let weather = MockServer::start().await;
    let gemini = MockServer::start().await;

    Mock::given(path("/data/2.5/weather"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({ "cod": "404", "message": "city not found" })),
        )
        .expect(1)
        .mount(&weather)
        .await;
    Mock::given(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&weather)
        .await;

    let (status, body) = send(app_with(&weather, &gemini).await, get("/weather?city=Atlantis")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "City not found");
    weather.verify().await;
}

#[tokio::test]
async fn test_weather_domain_code_404_in_success_body() {
    let weather = MockServer::start().await;
    let gemini = MockServer::start().await;
    mount_weather(
        &weather,
        ResponseTemplate::new(200).set_body_json(json!({ "cod": "404", "message": "city not found" })),
        ResponseTemplate::new(200).set_body_json(forecast_around_now(8)),
    )
    .await;

    let (status, body) = send(app_with(&weather, &gemini).await, get("/weather?city=London")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_weather_domain_error_mirrors_upstream_code() {
    let weather = MockServer::start().await;
    let gemini = MockServer::start().await;
    mount_weather(
        &weather,
        ResponseTemplate::new(200).set_body_json(json!({ "cod": "429", "message": "Too many requests" })),
        ResponseTemplate::new(200).set_body_json(forecast_around_now(8)),
    )
    .await;

    let (status, body) = send(app_with(&weather, &gemini).await, get("/weather?city=London")).await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"], "Too many requests");
    assert_eq!(body["code"], "UPSTREAM_API_ERROR");
}

#[tokio::test]
async fn test_weather_http_error_hides_upstream_body() {
    let weather = MockServer::start().await;
    let gemini = MockServer::start().await;
    mount_weather(
        &weather,
        ResponseTemplate::new(401)
            .set_body_json(json!({ "cod": 401, "message": "Invalid API key secret-detail" })),
        ResponseTemplate::new(200).set_body_json(forecast_around_now(8)),
    )
    .await;

    let (status, body) = send(app_with(&weather, &gemini).await, get("/weather?city=London")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let message = body["error"].as_str().unwrap();
    assert!(message.starts_with("Could not retrieve weather data"));
    assert!(!message.contains("secret-detail"));
}

#[tokio::test]
async fn test_weather_forecast_failure_aborts_request() {
    let weather = MockServer::start().await;
    let gemini = MockServer::start().await;
    mount_weather(
        &weather,
        ResponseTemplate::new(200).set_body_json(london_current()),
        ResponseTemplate::new(502).set_body_string("bad gateway"),
    )
    .await;

    let (status, body) = send(app_with(&weather, &gemini).await, get("/weather?city=London")).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body.get("city").is_none());
    assert_eq!(body["code"], "UPSTREAM_HTTP_ERROR");
}

#[tokio::test]
async fn test_weather_malformed_current_skips_forecast() {
    let weather = MockServer::start().await;
    let gemini = MockServer::start().await;

    let mut current = london_current();
    current.as_object_mut().unwrap().remove("main");
    Mock::given(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current))
        .mount(&weather)
        .await;
    Mock::given(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_around_now(8)))
        .expect(0)
        .mount(&weather)
        .await;

    let (status, body) = send(app_with(&weather, &gemini).await, get("/weather?city=London")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "MALFORMED_RESPONSE");
    weather.verify().await;
}

#[tokio::test]
async fn test_weather_unreachable_upstream() {
    let gemini = MockServer::start().await;
    // Nothing listens on port 1
    let config = test_config("http://127.0.0.1:1", &gemini.uri());

    let (status, body) = send(app(config), get("/weather?city=London")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        "Failed to connect to weather service. Please check your internet connection."
    );
}

// ============================================================================
// POST /ask-ai
// ============================================================================

#[tokio::test]
async fn test_ask_ai_success() {
    let weather = MockServer::start().await;
    let gemini = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .and(query_param("key", "gemini-key"))
        .and(body_string_contains("Will it rain tonight?"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_answer("Yes, after 9 PM.")))
        .expect(1)
        .mount(&gemini)
        .await;

    let forecast = json!([
        { "timestamp": 1, "time": "09:00 PM", "temperature": 11.5, "description": "light rain", "icon": "x" }
    ]);
    let (status, body) = send(
        app_with(&weather, &gemini).await,
        post_json("/ask-ai", &ask_body(forecast)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "response": "Yes, after 9 PM." }));

    let prompt = sent_prompt(&gemini).await;
    assert!(prompt.contains("London, GB"));
    assert!(prompt.contains("- At 09:00 PM: Temperature 11.5°C, Description: light rain"));
    assert!(!prompt.contains(FORECAST_FALLBACK));
}

#[tokio::test]
async fn test_ask_ai_empty_forecast_uses_fallback_sentence() {
    let weather = MockServer::start().await;
    let gemini = MockServer::start().await;
    Mock::given(path(GEMINI_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_answer("No data.")))
        .mount(&gemini)
        .await;

    let (status, _) = send(
        app_with(&weather, &gemini).await,
        post_json("/ask-ai", &ask_body(json!([]))),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let prompt = sent_prompt(&gemini).await;
    assert!(prompt.contains(FORECAST_FALLBACK));
    assert!(!prompt.contains("- At "));
}

#[tokio::test]
async fn test_ask_ai_forbidden_reports_credentials() {
    let weather = MockServer::start().await;
    let gemini = MockServer::start().await;
    Mock::given(path(GEMINI_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": { "code": 403, "message": "API key not valid", "status": "PERMISSION_DENIED" }
        })))
        .mount(&gemini)
        .await;

    let (status, body) = send(
        app_with(&weather, &gemini).await,
        post_json("/ask-ai", &ask_body(json!([]))),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "AI_AUTH_ERROR");
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("API key is correct and valid"));
    assert_ne!(message, "Could not get AI response from service.");
}

#[tokio::test]
async fn test_ask_ai_other_http_error_mirrors_status() {
    let weather = MockServer::start().await;
    let gemini = MockServer::start().await;
    Mock::given(path(GEMINI_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
        .mount(&gemini)
        .await;

    let (status, body) = send(
        app_with(&weather, &gemini).await,
        post_json("/ask-ai", &ask_body(json!([]))),
    )
    .await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"], "Could not get AI response from service.");
}

#[tokio::test]
async fn test_ask_ai_empty_candidates() {
    let weather = MockServer::start().await;
    let gemini = MockServer::start().await;
    Mock::given(path(GEMINI_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&gemini)
        .await;

    let (status, body) = send(
        app_with(&weather, &gemini).await,
        post_json("/ask-ai", &ask_body(json!([]))),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "No valid response from AI. Please try again.");
}

#[tokio::test]
async fn test_ask_ai_missing_prompt_makes_no_upstream_call() {
    let weather = MockServer::start().await;
    let gemini = MockServer::start().await;
    expect_no_calls(&gemini).await;

    let mut request = ask_body(json!([]));
    request.as_object_mut().unwrap().remove("prompt");

    let (status, body) = send(app_with(&weather, &gemini).await, post_json("/ask-ai", &request)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Prompt or current weather data is missing");
    gemini.verify().await;
}

#[tokio::test]
async fn test_ask_ai_missing_current_weather() {
    let weather = MockServer::start().await;
    let gemini = MockServer::start().await;
    expect_no_calls(&gemini).await;

    let (status, _) = send(
        app_with(&weather, &gemini).await,
        post_json("/ask-ai", &json!({ "prompt": "Rain?" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    gemini.verify().await;
}

#[tokio::test]
async fn test_ask_ai_invalid_json_body() {
    let weather = MockServer::start().await;
    let gemini = MockServer::start().await;
    expect_no_calls(&gemini).await;

    let request = Request::builder()
        .method("POST")
        .uri("/ask-ai")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(app_with(&weather, &gemini).await, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_REQUEST");
    gemini.verify().await;
}

#[tokio::test]
async fn test_ask_ai_unreachable_upstream() {
    let weather = MockServer::start().await;
    let config = test_config(&weather.uri(), "http://127.0.0.1:1");

    let (status, body) = send(app(config), post_json("/ask-ai", &ask_body(json!([])))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        "Failed to connect to AI service. Please check your internet connection."
    );
}

// ============================================================================
// Pages
// ============================================================================

#[tokio::test]
async fn test_index_serves_html() {
    let weather = MockServer::start().await;
    let gemini = MockServer::start().await;

    let response = app_with(&weather, &gemini)
        .await
        .oneshot(get("/"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/html"));
}

#[tokio::test]
async fn test_health() {
    let weather = MockServer::start().await;
    let gemini = MockServer::start().await;

    let (status, body) = send(app_with(&weather, &gemini).await, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
