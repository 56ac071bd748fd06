use clap::Parser;
use std::time::Duration;

/// Runtime configuration.
///
/// API keys are deliberately not part of this struct: the parsed config is
/// logged at startup, and credentials must never reach the log output. The
/// backends read their keys from the environment themselves.
#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Server host to bind to
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Server port to bind to
    #[arg(long, env = "PORT", default_value = "8000")]
    pub port: u16,

    /// Model used by the primary (OpenAI) backend
    #[arg(long, env = "PRIMARY_MODEL", default_value = "gpt-4o-mini")]
    pub primary_model: String,

    /// Model used by the fallback (Gemini) backend
    #[arg(long, env = "FALLBACK_MODEL", default_value = "gemini-2.0-flash")]
    pub fallback_model: String,

    /// Sampling temperature; kept low so repeated calls on the same email agree
    #[arg(long, env = "TEMPERATURE", default_value = "0.2")]
    pub temperature: f64,

    /// Response token cap; generous enough that the reason is not cut mid-sentence
    #[arg(long, env = "MAX_RESPONSE_TOKENS", default_value = "250")]
    pub max_response_tokens: u32,

    /// Per-backend request timeout in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "30")]
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
