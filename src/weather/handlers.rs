use axum::{extract::State, Json};

use super::models::WeatherReport;
use super::service::WeatherError;
use crate::extractors::RequiredCity;
use crate::AppState;

/// Current weather and the next 24h of 3-hourly forecast
///
/// GET /weather?city=London
#[utoipa::path(
    get,
    path = "/weather",
    tag = "weather",
    params(crate::extractors::WeatherQuery),
    responses(
        (status = 200, description = "Current conditions with forecast", body = WeatherReport),
        (status = 400, description = "City parameter is missing", body = crate::error::ErrorResponse),
        (status = 404, description = "City not found", body = crate::error::ErrorResponse),
        (status = 500, description = "Weather service unreachable or returned bad data", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_weather(
    State(state): State<AppState>,
    RequiredCity(city): RequiredCity,
) -> Result<Json<WeatherReport>, WeatherError> {
    let report = state.weather_service.get_weather(&city).await?;
    Ok(Json(report))
}
