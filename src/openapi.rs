use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::assistant::models::{AskAiRequest, AskAiResponse, ForecastContextEntry, WeatherContext};
use crate::error::ErrorResponse;
use crate::pages::HealthResponse;
use crate::weather::{ForecastEntry, WeatherReport};

/// OpenAPI documentation for the Skychat API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Skychat API",
        version = "1.0.0",
        description = "Current weather and 24h forecast from OpenWeatherMap, plus weather questions answered by Gemini.",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    paths(
        crate::weather::handlers::get_weather,
        crate::assistant::handlers::ask_ai,
        crate::pages::health,
    ),
    tags(
        (name = "weather", description = "Current weather with forecast"),
        (name = "assistant", description = "Weather questions answered by an AI model"),
        (name = "health", description = "Service status")
    ),
    components(
        schemas(
            ErrorResponse,
            WeatherReport,
            ForecastEntry,
            AskAiRequest,
            AskAiResponse,
            WeatherContext,
            ForecastContextEntry,
            HealthResponse,
        )
    )
)]
pub struct ApiDoc;

/// Create the Swagger UI router
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}
