use serde::{Deserialize, Serialize};

/// Body of `POST /classify`.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassificationRequest {
    pub content: String,
}

/// Verdict for a single email.
///
/// Also serves as the schema that provider output is validated against, so
/// unknown fields are rejected at the parse boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Classification {
    pub is_spam: bool,
    pub reason: String,
}
