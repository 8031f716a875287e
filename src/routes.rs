use axum::{
    error_handling::HandleErrorLayer,
    http::{header, Method, StatusCode},
    routing::{get, post},
    BoxError, Json, Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::assistant::handlers as assistant_handlers;
use crate::error::ErrorResponse;
use crate::openapi::swagger_ui;
use crate::pages;
use crate::weather::handlers as weather_handlers;
use crate::AppState;

/// Handle request timeout errors
async fn handle_timeout_error(err: BoxError) -> (StatusCode, Json<ErrorResponse>) {
    if err.is::<tower::timeout::error::Elapsed>() {
        (
            StatusCode::REQUEST_TIMEOUT,
            Json(ErrorResponse::with_code("Request timed out", "TIMEOUT")),
        )
    } else {
        tracing::error!(error = %err, "Unhandled middleware error");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::with_code(
                format!("An unexpected error occurred: {}", err),
                "UNEXPECTED_ERROR",
            )),
        )
    }
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/weather", get(weather_handlers::get_weather))
        .route("/ask-ai", post(assistant_handlers::ask_ai))
}

/// Build the complete application router
pub fn build_router(state: AppState) -> Router {
    let request_timeout = Duration::from_secs(state.config.request_timeout_secs);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(pages::index))
        .route("/health", get(pages::health))
        .merge(api_routes())
        .merge(swagger_ui())
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_timeout_error))
                .timeout(request_timeout),
        )
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
