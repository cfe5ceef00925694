use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::GeminiResult;
use crate::types::GenerateContentRequest;

/// A hosted model that turns a fully assembled request into reply text
#[async_trait]
pub trait LanguageModel: Send + Sync + Debug {
    /// Runs a single completion and returns its text
    async fn generate(&self, request: GenerateContentRequest) -> GeminiResult<String>;
}

/// Type alias for Arc-wrapped LanguageModel trait objects
pub type LanguageModelRef = Arc<dyn LanguageModel>;
