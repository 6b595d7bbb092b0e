pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    self, validate_file_extension, validate_non_empty_string, validate_path,
    validate_positive_number, validate_range, validate_url,
};
#[cfg(feature = "cli")]
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(Parser))]
#[cfg_attr(
    feature = "cli",
    command(name = "medbill-etl"),
    command(about = "Explode free-text medical service definitions into billing records")
)]
pub struct CliConfig {
    /// Base URL of the Ollama instance
    #[cfg_attr(feature = "cli", arg(long, default_value = "http://localhost:11434"))]
    pub ollama_endpoint: String,

    /// Model used for extraction
    #[cfg_attr(feature = "cli", arg(long, default_value = "llama3.1"))]
    pub model: String,

    /// Per-call timeout for the LLM service, in seconds
    #[cfg_attr(feature = "cli", arg(long, default_value = "300"))]
    pub llm_timeout_secs: u64,

    /// Input CSV with SERVICE_CATEGORY_NAME and DEFINITION columns
    #[cfg_attr(feature = "cli", arg(long, default_value = "./input.csv"))]
    pub input_path: String,

    /// Directory the output table is written into
    #[cfg_attr(feature = "cli", arg(long, default_value = "./output"))]
    pub output_path: String,

    /// Output CSV filename
    #[cfg_attr(feature = "cli", arg(long, default_value = "billing_output.csv"))]
    pub output_filename: String,

    /// Pause between LLM calls, in milliseconds
    #[cfg_attr(feature = "cli", arg(long, default_value = "300"))]
    pub request_delay_ms: u64,

    /// Load settings from a TOML config file instead of CLI flags
    #[cfg_attr(feature = "cli", arg(long))]
    pub config: Option<String>,

    /// Enable verbose output
    #[cfg_attr(feature = "cli", arg(long, help = "Enable verbose output"))]
    pub verbose: bool,

    /// Enable system monitoring
    #[cfg_attr(feature = "cli", arg(long, help = "Enable system monitoring"))]
    pub monitor: bool,
}

impl ConfigProvider for CliConfig {
    fn llm_endpoint(&self) -> &str {
        &self.ollama_endpoint
    }

    fn llm_model(&self) -> &str {
        &self.model
    }

    fn llm_timeout_secs(&self) -> u64 {
        self.llm_timeout_secs
    }

    fn input_path(&self) -> &str {
        &self.input_path
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_filename(&self) -> String {
        self.output_filename.clone()
    }

    fn request_delay_ms(&self) -> u64 {
        self.request_delay_ms
    }
}

impl validation::Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("ollama_endpoint", &self.ollama_endpoint)?;
        validate_non_empty_string("model", &self.model)?;
        validate_positive_number("llm_timeout_secs", self.llm_timeout_secs, 1)?;
        validate_path("input_path", &self.input_path)?;
        validate_file_extension("input_path", &self.input_path, &["csv"])?;
        validate_path("output_path", &self.output_path)?;
        validate_non_empty_string("output_filename", &self.output_filename)?;
        validate_range("request_delay_ms", self.request_delay_ms, 0, 60_000)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validation::Validate;

    fn valid_config() -> CliConfig {
        CliConfig {
            ollama_endpoint: "http://localhost:11434".to_string(),
            model: "llama3.1".to_string(),
            llm_timeout_secs: 300,
            input_path: "./input.csv".to_string(),
            output_path: "./output".to_string(),
            output_filename: "billing_output.csv".to_string(),
            request_delay_ms: 300,
            config: None,
            verbose: false,
            monitor: false,
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_bad_endpoint_fails() {
        let mut config = valid_config();
        config.ollama_endpoint = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_csv_input_fails() {
        let mut config = valid_config();
        config.input_path = "./input.xlsx".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_fails() {
        let mut config = valid_config();
        config.llm_timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
