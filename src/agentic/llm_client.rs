//! LLM Client Trait
//!
//! Unified interface over hosted chat-completion providers.

use async_trait::async_trait;

use crate::error::SectionsError;

/// Unified chat-completion client interface.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Call the model with system + user prompts, return the raw text reply.
    async fn chat(&self, system_prompt: &str, user_prompt: &str) -> Result<String, SectionsError>;

    /// Get the model name for logging
    fn model_name(&self) -> &str;

    /// Get the provider name for logging
    fn provider_name(&self) -> &str;
}
