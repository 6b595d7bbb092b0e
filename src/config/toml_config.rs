use crate::core::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{
    validate_file_extension, validate_non_empty_string, validate_path, validate_positive_number,
    validate_range, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_MODEL: &str = "llama3.1";
const DEFAULT_OUTPUT_FILENAME: &str = "billing_output.csv";
const DEFAULT_REQUEST_DELAY_MS: u64 = 300;
const DEFAULT_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: PipelineConfig,
    pub llm: LlmConfig,
    pub source: SourceConfig,
    pub load: LoadConfig,
    pub processing: Option<ProcessingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub endpoint: String,
    pub model: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub input_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_filename: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    pub request_delay_ms: Option<u64>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${OLLAMA_HOST})
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }
}

impl ConfigProvider for TomlConfig {
    fn llm_endpoint(&self) -> &str {
        &self.llm.endpoint
    }

    fn llm_model(&self) -> &str {
        self.llm.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    fn llm_timeout_secs(&self) -> u64 {
        self.llm.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    fn input_path(&self) -> &str {
        &self.source.input_path
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    /// 支援 {timestamp} 佔位符，例如 billing_{timestamp}.csv
    fn output_filename(&self) -> String {
        self.load
            .output_filename
            .as_deref()
            .unwrap_or(DEFAULT_OUTPUT_FILENAME)
            .replace(
                "{timestamp}",
                &chrono::Utc::now().format("%Y%m%d_%H%M%S").to_string(),
            )
    }

    fn request_delay_ms(&self) -> u64 {
        self.processing
            .as_ref()
            .and_then(|p| p.request_delay_ms)
            .unwrap_or(DEFAULT_REQUEST_DELAY_MS)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("pipeline.name", &self.pipeline.name)?;
        validate_url("llm.endpoint", &self.llm.endpoint)?;
        if let Some(model) = &self.llm.model {
            validate_non_empty_string("llm.model", model)?;
        }
        if let Some(timeout) = self.llm.timeout_seconds {
            validate_positive_number("llm.timeout_seconds", timeout, 1)?;
        }
        validate_path("source.input_path", &self.source.input_path)?;
        validate_file_extension("source.input_path", &self.source.input_path, &["csv"])?;
        validate_path("load.output_path", &self.load.output_path)?;
        if let Some(processing) = &self.processing {
            if let Some(delay) = processing.request_delay_ms {
                validate_range("processing.request_delay_ms", delay, 0, 60_000)?;
            }
        }
        Ok(())
    }
}
