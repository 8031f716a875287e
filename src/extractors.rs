use axum::{
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Query, Request},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize};
use utoipa::IntoParams;

use crate::error::ErrorResponse;
use crate::weather::WeatherError;

/// Query parameters for `/weather`
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WeatherQuery {
    /// City name, optionally with a country code (`Paris,FR`)
    pub city: Option<String>,
}

/// Non-blank, trimmed `city` query parameter.
///
/// Rejects with `MissingParameter` before the handler runs, so no upstream
/// request is made for a missing city.
#[derive(Debug)]
pub struct RequiredCity(pub String);

impl<S> FromRequestParts<S> for RequiredCity
where
    S: Send + Sync,
{
    type Rejection = WeatherError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<WeatherQuery>::from_request_parts(parts, state)
            .await
            .map_err(|_| WeatherError::MissingParameter)?;

        query
            .city
            .map(|city| city.trim().to_string())
            .filter(|city| !city.is_empty())
            .map(RequiredCity)
            .ok_or(WeatherError::MissingParameter)
    }
}

/// `Json<T>` whose rejections are JSON error bodies with status 400
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = JsonBodyRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(JsonBodyRejection)?;
        Ok(JsonBody(value))
    }
}

#[derive(Debug)]
pub struct JsonBodyRejection(pub JsonRejection);

impl IntoResponse for JsonBodyRejection {
    fn into_response(self) -> Response {
        let message = self.0.body_text();
        tracing::warn!(error = %message, status = %self.0.status(), "Rejected request body");
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::with_code(message, "INVALID_REQUEST")),
        )
            .into_response()
    }
}
