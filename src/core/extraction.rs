use serde_json::{Map, Value};

use crate::domain::model::Extraction;
use crate::domain::ports::{GenerationOptions, LlmClient};
use crate::utils::error::{EtlError, Result};

/// Turns one free-text definition into an [`Extraction`] via the LLM port.
///
/// Failures never escalate past this client: a failed call, a non-JSON
/// response or an empty extraction all come back as `None` so the caller can
/// skip the row and keep going.
pub struct ExtractionClient<L: LlmClient> {
    llm: L,
}

impl<L: LlmClient> ExtractionClient<L> {
    pub fn new(llm: L) -> Self {
        Self { llm }
    }

    pub async fn extract(&self, definition: &str) -> Option<Extraction> {
        let prompt = build_prompt(definition);

        // temperature 0: 抽取結果必須可重現
        let options = GenerationOptions::default();

        let raw = match self.llm.complete(&prompt, &options).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("⚠ LLM call failed: {}", e);
                return None;
            }
        };

        match parse_extraction(&raw) {
            Ok(extraction) => extraction,
            Err(e) => {
                tracing::warn!("⚠ Could not parse LLM response: {}", e);
                None
            }
        }
    }
}

/// Build the extraction prompt for one definition.
pub fn build_prompt(definition: &str) -> String {
    format!(
        r#"You are a medical billing extraction assistant.

Extract structured data from the following definition.

Return STRICT JSON only in this format:

{{
  "serviceCodes": [],
  "diagnosisCodes": [],
  "revenueCodes": [],
  "modifier": "",
  "pos": [],
  "typeOfBill": "",
  "gender": "",
  "minAge": "",
  "maxAge": ""
}}

Rules:
- Expand service code ranges like "99242 to 99245" into list
- If nothing found return empty
- Return JSON only
- No explanation text

Definition:
{definition}
"#
    )
}

/// Strip markdown code-fence markers the model may wrap its JSON in.
fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

/// Parse the raw response into an extraction record.
///
/// Returns `Ok(None)` for an empty JSON object (the model found nothing),
/// `Err` when the text is not a JSON object at all.
fn parse_extraction(raw: &str) -> Result<Option<Extraction>> {
    let cleaned = strip_code_fences(raw);
    let value: Value = serde_json::from_str(&cleaned)?;

    let obj = value.as_object().ok_or_else(|| EtlError::ProcessingError {
        message: "LLM response is not a JSON object".to_string(),
    })?;

    if obj.is_empty() {
        return Ok(None);
    }

    Ok(Some(Extraction {
        service_codes: list_field(obj, "serviceCodes"),
        diagnosis_codes: list_field(obj, "diagnosisCodes"),
        revenue_codes: list_field(obj, "revenueCodes"),
        modifier: string_field(obj, "modifier"),
        pos: list_field(obj, "pos"),
        type_of_bill: string_field(obj, "typeOfBill"),
        gender: string_field(obj, "gender"),
        min_age: string_field(obj, "minAge"),
        max_age: string_field(obj, "maxAge"),
    }))
}

/// Read a scalar field, coercing numbers to their string form; missing or
/// null values become "".
fn string_field(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key).map(value_to_string).unwrap_or_default()
}

/// Read a list field; anything that is not an array becomes an empty list.
fn list_field(obj: &Map<String, Value>, key: &str) -> Vec<String> {
    match obj.get(key) {
        Some(Value::Array(items)) => items.iter().map(value_to_string).collect(),
        _ => Vec::new(),
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Null => String::new(),
        other => other.to_string().trim_matches('"').to_string(),
    }
}
