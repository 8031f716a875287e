//! Weather-aware question answering backed by a generative language model.

pub mod gemini;
pub mod handlers;
pub mod models;
pub mod prompt;
pub mod service;

pub use gemini::GeminiClient;
pub use service::{AssistantError, AssistantService};

use async_trait::async_trait;

/// A text-in, text-out language model
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generate an answer for a fully rendered prompt
    async fn generate(&self, prompt: &str) -> Result<String, AssistantError>;

    /// Model identifier, for logs
    fn model_name(&self) -> &str;
}
