pub mod etl;
pub mod expand;
pub mod extraction;
pub mod pipeline;

pub use crate::domain::model::{
    BillingRow, DefinitionRow, Extraction, TransformResult, OUTPUT_COLUMNS,
};
pub use crate::domain::ports::{
    ConfigProvider, GenerationOptions, LlmClient, Pipeline, Storage,
};
pub use crate::utils::error::Result;
