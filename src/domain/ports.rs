use crate::domain::model::{DefinitionRow, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn llm_endpoint(&self) -> &str;
    fn llm_model(&self) -> &str;
    fn llm_timeout_secs(&self) -> u64;
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_filename(&self) -> String;
    fn request_delay_ms(&self) -> u64;
}

/// Decoding directives for a completion call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationOptions {
    pub temperature: f32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self { temperature: 0.0 }
    }
}

/// The completion-service boundary: one prompt in, free text out.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, prompt: &str, options: &GenerationOptions) -> Result<String>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<DefinitionRow>>;
    async fn transform(&self, rows: Vec<DefinitionRow>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
