use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::clock;

/// Body of `POST /ask-ai`.
///
/// The weather context comes from the browser, so it is accepted loosely here
/// and validated into [`WeatherContext`] by the service.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AskAiRequest {
    /// The user's question
    pub prompt: Option<String>,
    /// A `WeatherReport` previously returned by `/weather`
    #[schema(value_type = Object)]
    pub current_weather: Option<Value>,
    /// Forecast entries from the same report
    #[schema(value_type = Option<Vec<ForecastContextEntry>>)]
    pub forecast: Option<Value>,
}

/// Current conditions the prompt is built from
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct WeatherContext {
    pub city: String,
    pub country: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub description: String,
    pub humidity: f64,
    pub pressure: f64,
    pub wind_speed: f64,
    pub sunrise: String,
    pub sunset: String,
    pub timezone_offset: i32,
}

impl WeatherContext {
    pub fn utc_offset(&self) -> Option<FixedOffset> {
        clock::utc_offset(self.timezone_offset)
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ForecastContextEntry {
    /// Local display time, e.g. `09:00 PM`
    pub time: String,
    pub temperature: f64,
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AskAiResponse {
    pub response: String,
}
