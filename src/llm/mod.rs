mod ollama;

pub use ollama::{MockLlmClient, OllamaClient};
