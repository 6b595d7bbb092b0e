use crate::core::expand::{expand_service_ranges, safe_join};
use crate::core::extraction::ExtractionClient;
use crate::core::{
    BillingRow, ConfigProvider, DefinitionRow, Extraction, LlmClient, Pipeline, Storage,
    TransformResult, OUTPUT_COLUMNS,
};
use crate::utils::error::{EtlError, Result};
use std::path::Path;

pub struct BillingPipeline<S: Storage, C: ConfigProvider, L: LlmClient> {
    storage: S,
    config: C,
    extraction: ExtractionClient<L>,
}

impl<S: Storage, C: ConfigProvider, L: LlmClient> BillingPipeline<S, C, L> {
    pub fn new(storage: S, config: C, llm: L) -> Self {
        Self {
            storage,
            config,
            extraction: ExtractionClient::new(llm),
        }
    }
}

/// Fan one definition row out into billing rows, one per resolved service
/// code. Service-code ranges are re-expanded here even though the prompt asks
/// the model to expand them already.
pub fn explode_row(row: &DefinitionRow, extraction: &Extraction) -> Vec<BillingRow> {
    let service_codes = expand_service_ranges(&extraction.service_codes);

    let age = if !extraction.min_age.is_empty() || !extraction.max_age.is_empty() {
        format!("{}-{}", extraction.min_age, extraction.max_age)
    } else {
        String::new()
    };

    let diagnosis_code = safe_join(&extraction.diagnosis_codes);
    let revenue_code = safe_join(&extraction.revenue_codes);
    let pos = safe_join(&extraction.pos);

    service_codes
        .into_iter()
        .map(|service_code| BillingRow {
            service_category: row.service_category.clone(),
            service_code,
            revenue_code: revenue_code.clone(),
            gender: extraction.gender.clone(),
            age: age.clone(),
            diagnosis_code: diagnosis_code.clone(),
            pos: pos.clone(),
            type_of_bill: extraction.type_of_bill.clone(),
            modifier: extraction.modifier.clone(),
            minutes: 1,
            billed_amount: 100,
        })
        .collect()
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, L: LlmClient> Pipeline for BillingPipeline<S, C, L> {
    async fn extract(&self) -> Result<Vec<DefinitionRow>> {
        tracing::debug!("Reading input table: {}", self.config.input_path());
        let data = self.storage.read_file(self.config.input_path()).await?;

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(data.as_slice());
        let headers = reader.headers()?.clone();
        let category_idx = headers.iter().position(|h| h == "SERVICE_CATEGORY_NAME");
        let definition_idx = headers.iter().position(|h| h == "DEFINITION");

        if category_idx.is_none() && definition_idx.is_none() {
            tracing::warn!(
                "Input has neither SERVICE_CATEGORY_NAME nor DEFINITION column, \
                 all rows will be empty"
            );
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let field = |idx: Option<usize>| {
                idx.and_then(|i| record.get(i)).unwrap_or("").to_string()
            };
            rows.push(DefinitionRow {
                service_category: field(category_idx),
                definition: field(definition_idx),
            });
        }

        Ok(rows)
    }

    async fn transform(&self, rows: Vec<DefinitionRow>) -> Result<TransformResult> {
        let mut billing_rows = Vec::new();
        let mut processed_rows = 0;
        let mut skipped_rows = 0;
        let total = rows.len();
        let delay_ms = self.config.request_delay_ms();

        for (index, row) in rows.iter().enumerate() {
            tracing::info!("Processing: {}", row.service_category);

            let extraction = match self.extraction.extract(&row.definition).await {
                Some(extraction) => extraction,
                None => {
                    tracing::warn!("⚠ Skipping due to empty LLM response");
                    skipped_rows += 1;
                    continue;
                }
            };

            let exploded = explode_row(row, &extraction);
            tracing::debug!(
                "Row {}/{}: {} billing rows",
                index + 1,
                total,
                exploded.len()
            );
            billing_rows.extend(exploded);
            processed_rows += 1;

            // 小延遲，避免 Ollama 過載
            if delay_ms > 0 && index < total - 1 {
                tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
            }
        }

        Ok(TransformResult {
            billing_rows,
            processed_rows,
            skipped_rows,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let filename = self.config.output_filename();
        let output_path = Path::new(self.config.output_path())
            .join(&filename)
            .to_string_lossy()
            .to_string();

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());

        // header row goes out even when no data rows were produced
        writer.write_record(OUTPUT_COLUMNS)?;
        for row in &result.billing_rows {
            writer.serialize(row)?;
        }

        let data = writer.into_inner().map_err(|e| EtlError::ProcessingError {
            message: format!("Failed to finalize CSV output: {}", e),
        })?;

        tracing::debug!("Writing {} bytes to {}", data.len(), output_path);
        self.storage.write_file(&output_path, &data).await?;

        Ok(output_path)
    }
}
