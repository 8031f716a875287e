use axum::http::StatusCode;
use chrono::Utc;
use reqwest::Client;
use thiserror::Error;

use super::models::*;
use super::shaper;
use crate::error::{upstream_status, HttpError};
use crate::impl_into_response;

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("City parameter is missing")]
    MissingParameter,

    #[error("City not found")]
    CityNotFound(String),

    /// Domain error reported inside the body (`cod` other than 200)
    #[error("{message}")]
    ApiError { status: u16, message: String },

    /// Non-success HTTP status; the upstream body is logged, not returned
    #[error("Could not retrieve weather data. City might be invalid or API limit reached.")]
    HttpStatus { status: u16 },

    #[error("Failed to connect to weather service. Please check your internet connection.")]
    Unreachable(#[source] reqwest::Error),

    #[error("Invalid weather data received: {0}")]
    MalformedResponse(String),

    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

impl HttpError for WeatherError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingParameter => StatusCode::BAD_REQUEST,
            Self::CityNotFound(_) => StatusCode::NOT_FOUND,
            Self::ApiError { status, .. } | Self::HttpStatus { status } => {
                upstream_status(*status)
            }
            Self::Unreachable(_) | Self::MalformedResponse(_) | Self::Unexpected(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::MissingParameter => Some("MISSING_PARAMETER"),
            Self::CityNotFound(_) => Some("CITY_NOT_FOUND"),
            Self::ApiError { .. } => Some("UPSTREAM_API_ERROR"),
            Self::HttpStatus { .. } => Some("UPSTREAM_HTTP_ERROR"),
            Self::Unreachable(_) => Some("UPSTREAM_UNREACHABLE"),
            Self::MalformedResponse(_) => Some("MALFORMED_RESPONSE"),
            Self::Unexpected(_) => Some("UNEXPECTED_ERROR"),
        }
    }
}

impl_into_response!(WeatherError);

impl WeatherError {
    /// DNS, connect, and timeout failures mean the service is unreachable;
    /// anything else reqwest reports is unexpected
    fn from_transport(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() || err.is_request() {
            Self::Unreachable(err)
        } else {
            Self::Unexpected(err.to_string())
        }
    }
}

pub struct WeatherService {
    client: Client,
    api_key: String,
    base_url: String,
}

impl WeatherService {
    pub fn new(client: Client, api_key: &str, base_url: &str) -> Self {
        Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Current conditions and the next 24h of forecast for `city`.
    ///
    /// The forecast is only requested once the current conditions have been
    /// fetched and validated.
    pub async fn get_weather(&self, city: &str) -> Result<WeatherReport, WeatherError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(WeatherError::MissingParameter);
        }

        let current = self.fetch_current(city).await?;
        let mut report = shaper::shape_current(current)?;

        let forecast = self.fetch_forecast(city).await?;
        let now = Utc::now();
        report.forecast = shaper::upcoming_forecast(forecast, now, report.timezone_offset)?;

        tracing::info!(
            city = %report.city,
            temp = %report.temperature,
            forecast_entries = report.forecast.len(),
            "Weather data fetched successfully"
        );

        Ok(report)
    }

    async fn fetch_current(&self, city: &str) -> Result<CurrentWeatherPayload, WeatherError> {
        let body = self.get("weather", city).await?;
        let envelope: StatusEnvelope = serde_json::from_str(&body.text).unwrap_or_default();
        let code = envelope.code();

        // OpenWeatherMap reports an unknown city as `cod: "404"`, usually
        // alongside an HTTP 404
        if code.as_deref() == Some("404") {
            tracing::debug!(city = %city, "City not found upstream");
            return Err(WeatherError::CityNotFound(city.to_string()));
        }

        body.ensure_success("current weather")?;

        if let Some(code) = code.filter(|c| c != "200") {
            let message = envelope
                .message()
                .unwrap_or("Unknown OpenWeatherMap API error")
                .to_string();
            tracing::error!(code = %code, message = %message, "OpenWeatherMap reported an error");
            return Err(WeatherError::ApiError {
                status: code.parse().unwrap_or(500),
                message,
            });
        }

        serde_json::from_str(&body.text)
            .map_err(|e| WeatherError::MalformedResponse(format!("current weather: {}", e)))
    }

    async fn fetch_forecast(&self, city: &str) -> Result<ForecastPayload, WeatherError> {
        let body = self.get("forecast", city).await?;
        body.ensure_success("forecast")?;

        serde_json::from_str(&body.text)
            .map_err(|e| WeatherError::MalformedResponse(format!("forecast: {}", e)))
    }

    async fn get(&self, endpoint: &str, city: &str) -> Result<UpstreamBody, WeatherError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        tracing::debug!(url = %url, city = %city, "Requesting OpenWeatherMap");

        let response = self
            .client
            .get(&url)
            .query(&[("q", city), ("appid", self.api_key.as_str()), ("units", "metric")])
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, endpoint = %endpoint, "Request to OpenWeatherMap failed");
                WeatherError::from_transport(e)
            })?;

        let status = response.status();
        tracing::debug!(status = %status, endpoint = %endpoint, "Received API response");

        let text = response.text().await.map_err(|e| {
            tracing::error!(error = %e, endpoint = %endpoint, "Failed to read OpenWeatherMap body");
            WeatherError::Unreachable(e)
        })?;

        Ok(UpstreamBody { status, text })
    }
}

struct UpstreamBody {
    status: reqwest::StatusCode,
    text: String,
}

impl UpstreamBody {
    fn ensure_success(&self, what: &str) -> Result<(), WeatherError> {
        if self.status.is_success() {
            return Ok(());
        }
        tracing::error!(
            status = %self.status,
            body = %self.text,
            "API request failed for OpenWeatherMap ({})",
            what
        );
        Err(WeatherError::HttpStatus {
            status: self.status.as_u16(),
        })
    }
}
