mod gemini;
mod openai;

pub use gemini::GeminiBackend;
pub use openai::OpenAiBackend;
