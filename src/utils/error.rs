use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("LLM service error: {message}")]
    LlmServiceError { message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid config value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Config,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// 警告性質，不影響結果
    Low,
    /// 可重試的暫時性錯誤
    Medium,
    /// 處理錯誤，本次執行失敗
    High,
    /// 系統層級錯誤
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ApiError(_) | EtlError::LlmServiceError { .. } => ErrorCategory::Network,
            EtlError::CsvError(_) | EtlError::SerializationError(_) => ErrorCategory::Data,
            EtlError::ConfigError { .. } | EtlError::InvalidConfigValueError { .. } => {
                ErrorCategory::Config
            }
            EtlError::ProcessingError { .. } => ErrorCategory::Data,
            EtlError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EtlError::ApiError(_) | EtlError::LlmServiceError { .. } => ErrorSeverity::Medium,
            EtlError::CsvError(_)
            | EtlError::SerializationError(_)
            | EtlError::ProcessingError { .. } => ErrorSeverity::High,
            EtlError::ConfigError { .. } | EtlError::InvalidConfigValueError { .. } => {
                ErrorSeverity::High
            }
            EtlError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::ApiError(_) => "Check network connectivity and the Ollama endpoint URL",
            EtlError::LlmServiceError { .. } => {
                "Make sure Ollama is running (`ollama serve`) and the model is pulled"
            }
            EtlError::CsvError(_) => {
                "Check that the input file is valid CSV with the expected columns"
            }
            EtlError::IoError(_) => "Check file paths and filesystem permissions",
            EtlError::SerializationError(_) => "Check the structure of the data being processed",
            EtlError::ConfigError { .. } | EtlError::InvalidConfigValueError { .. } => {
                "Fix the configuration value and run again"
            }
            EtlError::ProcessingError { .. } => "Inspect the log output for the failing row",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::ApiError(e) => format!("Could not reach the LLM service: {}", e),
            EtlError::LlmServiceError { message } => format!("LLM service problem: {}", message),
            EtlError::CsvError(e) => format!("Input/output table problem: {}", e),
            EtlError::IoError(e) => format!("File system problem: {}", e),
            EtlError::SerializationError(e) => format!("Data format problem: {}", e),
            EtlError::ConfigError { message } => format!("Configuration problem: {}", message),
            EtlError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration problem with '{}': {}", field, reason)
            }
            EtlError::ProcessingError { message } => format!("Processing problem: {}", message),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
