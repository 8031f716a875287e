use axum::{extract::State, Json};

use super::models::{AskAiRequest, AskAiResponse};
use super::service::AssistantError;
use crate::extractors::JsonBody;
use crate::AppState;

/// Ask a question about the weather shown in the frontend
///
/// POST /ask-ai
#[utoipa::path(
    post,
    path = "/ask-ai",
    tag = "assistant",
    request_body = AskAiRequest,
    responses(
        (status = 200, description = "Answer from the AI model", body = AskAiResponse),
        (status = 400, description = "Prompt or weather context missing or malformed", body = crate::error::ErrorResponse),
        (status = 403, description = "AI service rejected the configured API key", body = crate::error::ErrorResponse),
        (status = 500, description = "AI service unreachable or returned no answer", body = crate::error::ErrorResponse)
    )
)]
pub async fn ask_ai(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<AskAiRequest>,
) -> Result<Json<AskAiResponse>, AssistantError> {
    let response = state.assistant_service.ask(request).await?;
    Ok(Json(AskAiResponse { response }))
}
