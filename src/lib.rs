//! Weather lookup and weather-aware AI assistant backend.
//!
//! `GET /weather` proxies OpenWeatherMap and reshapes the current conditions
//! and 3-hourly forecast for the browser. `POST /ask-ai` turns that data and
//! a user question into a prompt for Gemini.

pub mod assistant;
pub mod clock;
pub mod config;
pub mod error;
pub mod extractors;
pub mod openapi;
pub mod pages;
pub mod routes;
pub mod weather;

use reqwest::Client;
use std::{sync::Arc, time::Duration};

use crate::assistant::{AssistantService, GeminiClient};
use crate::config::AppConfig;
use crate::weather::WeatherService;

pub use routes::build_router;

const HTTP_CONNECT_TIMEOUT_SECS: u64 = 5;
const HTTP_POOL_IDLE_TIMEOUT_SECS: u64 = 90;

#[derive(Clone)]
pub struct AppState {
    pub weather_service: Arc<WeatherService>,
    pub assistant_service: Arc<AssistantService>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Wire the services from configuration, sharing one HTTP client
    pub fn new(config: AppConfig, http_client: Client) -> Self {
        let weather_service = Arc::new(WeatherService::new(
            http_client.clone(),
            &config.openweathermap_api_key,
            &config.weather_api_url,
        ));

        let gemini = GeminiClient::new(
            http_client,
            &config.gemini_api_key,
            &config.gemini_model,
            &config.gemini_api_url,
        );
        let assistant_service = Arc::new(AssistantService::new(Arc::new(gemini)));

        Self {
            weather_service,
            assistant_service,
            config: Arc::new(config),
        }
    }
}

/// Shared HTTP client with connection pooling and the configured timeout
pub fn create_http_client(config: &AppConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(config.upstream_timeout_secs))
        .connect_timeout(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS))
        .pool_idle_timeout(Duration::from_secs(HTTP_POOL_IDLE_TIMEOUT_SECS))
        .pool_max_idle_per_host(10)
        .build()
}
