pub mod config;
pub mod core;
pub mod domain;
pub mod llm;
pub mod utils;

pub use config::cli::LocalStorage;
pub use config::toml_config::TomlConfig;
pub use config::CliConfig;
pub use core::{etl::EtlEngine, pipeline::BillingPipeline};
pub use llm::{MockLlmClient, OllamaClient};
pub use utils::error::{EtlError, Result};
