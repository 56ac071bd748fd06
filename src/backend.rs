use anyhow::Result;
use async_trait::async_trait;

/// An external LLM provider that can answer a rendered classification prompt.
///
/// Implementations return the raw model text. Validation against the verdict
/// schema happens in the classifier, so both providers are held to the same
/// contract regardless of how much structure they enforce natively.
#[async_trait]
pub trait Backend: Send + Sync {
    fn name(&self) -> &'static str;

    async fn complete(&self, prompt: &str) -> Result<String>;
}
