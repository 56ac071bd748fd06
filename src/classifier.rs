use std::sync::Arc;

use thiserror::Error;

use crate::backend::Backend;
use crate::prompt;
use crate::types::Classification;

/// Returned when neither backend produced a usable verdict. Structurally
/// distinct from a "not spam" classification: callers must treat it as an
/// error, never as a default verdict.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("both classification backends failed (primary: {primary}; fallback: {fallback})")]
    BackendsExhausted { primary: String, fallback: String },
}

/// Primary/fallback sequencer over two injected backend handles.
///
/// Each call is independent: the primary is tried first every time, one
/// attempt per backend, no retries and no failure memory across calls.
pub struct Classifier {
    primary: Arc<dyn Backend>,
    fallback: Arc<dyn Backend>,
}

impl Classifier {
    pub fn new(primary: Arc<dyn Backend>, fallback: Arc<dyn Backend>) -> Self {
        Self { primary, fallback }
    }

    #[tracing::instrument(skip(self, email), fields(email_len = email.len()))]
    pub async fn classify(&self, email: &str) -> Result<Classification, ClassifyError> {
        let prompt = prompt::render(email);

        let primary_cause = match self.attempt(self.primary.as_ref(), &prompt).await {
            Ok(verdict) => return Ok(verdict),
            Err(cause) => cause,
        };

        tracing::debug!("primary backend failed, trying fallback");

        let fallback_cause = match self.attempt(self.fallback.as_ref(), &prompt).await {
            Ok(verdict) => return Ok(verdict),
            Err(cause) => cause,
        };

        Err(ClassifyError::BackendsExhausted {
            primary: primary_cause,
            fallback: fallback_cause,
        })
    }

    /// One attempt against one backend. Every failure mode (network error,
    /// non-2xx status, unparseable or schema-mismatched output) collapses into
    /// the returned cause string; nothing backend-specific propagates.
    async fn attempt(&self, backend: &dyn Backend, prompt: &str) -> Result<Classification, String> {
        let text = match backend.complete(prompt).await {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(backend = backend.name(), error = %err, "backend call failed");
                return Err(err.to_string());
            }
        };

        match parse_classification(&text) {
            Ok(verdict) => Ok(verdict),
            Err(err) => {
                tracing::warn!(backend = backend.name(), error = %err, "backend returned unusable output");
                Err(err.to_string())
            }
        }
    }
}

/// Strict parse of a model answer into the two-field verdict. Shared by both
/// backends so neither provider's output quirks leak into the public contract.
fn parse_classification(text: &str) -> serde_json::Result<Classification> {
    serde_json::from_str(text.trim())
}
