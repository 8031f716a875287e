use axum::http::StatusCode;
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

use super::models::{AskAiRequest, ForecastContextEntry, WeatherContext};
use super::prompt::WeatherPrompt;
use super::LanguageModel;
use crate::error::{upstream_status, HttpError};
use crate::impl_into_response;

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("Prompt or current weather data is missing")]
    MissingParameter,

    #[error("Invalid weather context: {0}")]
    InvalidContext(String),

    #[error("Failed to connect to AI service. Please ensure your Gemini API key is correct and valid.")]
    AuthFailed,

    /// Non-success HTTP status other than 403; the upstream body is logged
    #[error("Could not get AI response from service.")]
    HttpStatus { status: u16 },

    #[error("Failed to connect to AI service. Please check your internet connection.")]
    Unreachable(#[source] reqwest::Error),

    #[error("Invalid AI service response: {0}")]
    MalformedResponse(String),

    #[error("No valid response from AI. Please try again.")]
    EmptyResponse,

    #[error("An unexpected error occurred with AI: {0}")]
    Unexpected(String),
}

impl HttpError for AssistantError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingParameter | Self::InvalidContext(_) => StatusCode::BAD_REQUEST,
            Self::AuthFailed => StatusCode::FORBIDDEN,
            Self::HttpStatus { status } => upstream_status(*status),
            Self::Unreachable(_)
            | Self::MalformedResponse(_)
            | Self::EmptyResponse
            | Self::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::MissingParameter => Some("MISSING_PARAMETER"),
            Self::InvalidContext(_) => Some("INVALID_REQUEST"),
            Self::AuthFailed => Some("AI_AUTH_ERROR"),
            Self::HttpStatus { .. } => Some("UPSTREAM_HTTP_ERROR"),
            Self::Unreachable(_) => Some("UPSTREAM_UNREACHABLE"),
            Self::MalformedResponse(_) => Some("MALFORMED_RESPONSE"),
            Self::EmptyResponse => Some("EMPTY_AI_RESPONSE"),
            Self::Unexpected(_) => Some("UNEXPECTED_ERROR"),
        }
    }
}

impl_into_response!(AssistantError);

impl AssistantError {
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() || err.is_request() {
            Self::Unreachable(err)
        } else {
            Self::Unexpected(err.to_string())
        }
    }
}

/// A validated `/ask-ai` request
#[derive(Debug)]
pub struct Question {
    pub text: String,
    pub weather: WeatherContext,
    pub forecast: Vec<ForecastContextEntry>,
}

impl TryFrom<AskAiRequest> for Question {
    type Error = AssistantError;

    fn try_from(request: AskAiRequest) -> Result<Self, Self::Error> {
        let text = request
            .prompt
            .filter(|p| !p.trim().is_empty())
            .ok_or(AssistantError::MissingParameter)?;

        let weather = match request.current_weather {
            None | Some(Value::Null) => return Err(AssistantError::MissingParameter),
            Some(Value::Object(map)) if map.is_empty() => {
                return Err(AssistantError::MissingParameter)
            }
            Some(value) => serde_json::from_value::<WeatherContext>(value)
                .map_err(|e| AssistantError::InvalidContext(format!("current_weather: {}", e)))?,
        };

        if weather.utc_offset().is_none() {
            return Err(AssistantError::InvalidContext(format!(
                "current_weather: timezone_offset out of range: {}",
                weather.timezone_offset
            )));
        }

        let forecast = match request.forecast {
            None | Some(Value::Null) => Vec::new(),
            Some(value) => serde_json::from_value(value)
                .map_err(|e| AssistantError::InvalidContext(format!("forecast: {}", e)))?,
        };

        Ok(Self {
            text,
            weather,
            forecast,
        })
    }
}

pub struct AssistantService {
    model: Arc<dyn LanguageModel>,
}

impl AssistantService {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Answer a weather question using the supplied context
    pub async fn ask(&self, request: AskAiRequest) -> Result<String, AssistantError> {
        let question = Question::try_from(request)?;

        let prompt = WeatherPrompt {
            question: &question.text,
            weather: &question.weather,
            forecast: &question.forecast,
            now: Utc::now(),
        }
        .to_string();

        tracing::debug!(
            city = %question.weather.city,
            model = %self.model.model_name(),
            forecast_entries = question.forecast.len(),
            "Asking AI about weather"
        );

        let answer = self.model.generate(&prompt).await?;

        tracing::info!(city = %question.weather.city, answer_len = answer.len(), "AI response received");

        Ok(answer)
    }
}
