mod error;
mod gemini;

use async_trait::async_trait;

pub use error::{GenerationError, GenerationErrorKind};
pub use gemini::GeminiModel;

/// Anything that turns a prompt into generated text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}
