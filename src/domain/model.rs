use serde::{Deserialize, Serialize};

/// One row of the input table: a service category and its free-text definition.
#[derive(Debug, Clone, Default)]
pub struct DefinitionRow {
    pub service_category: String,
    pub definition: String,
}

/// Structured fields extracted from one definition by the LLM.
///
/// Fields the model omits default to their empty form; numbers in the raw
/// JSON are coerced to strings before they land here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub service_codes: Vec<String>,
    pub diagnosis_codes: Vec<String>,
    pub revenue_codes: Vec<String>,
    pub modifier: String,
    pub pos: Vec<String>,
    pub type_of_bill: String,
    pub gender: String,
    pub min_age: String,
    pub max_age: String,
}

/// One billing record in the output table, one per resolved service code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingRow {
    #[serde(rename = "ServiceCategory")]
    pub service_category: String,
    #[serde(rename = "ServiceCode")]
    pub service_code: String,
    #[serde(rename = "RevenueCode")]
    pub revenue_code: String,
    #[serde(rename = "Gender")]
    pub gender: String,
    #[serde(rename = "Age")]
    pub age: String,
    #[serde(rename = "DiagnosisCode")]
    pub diagnosis_code: String,
    #[serde(rename = "POS")]
    pub pos: String,
    #[serde(rename = "TypeOfBill")]
    pub type_of_bill: String,
    #[serde(rename = "Modifier")]
    pub modifier: String,
    #[serde(rename = "Minutes")]
    pub minutes: u32,
    #[serde(rename = "Billed_Amnt")]
    pub billed_amount: u32,
}

/// Output column order of the billing table.
pub const OUTPUT_COLUMNS: [&str; 11] = [
    "ServiceCategory",
    "ServiceCode",
    "RevenueCode",
    "Gender",
    "Age",
    "DiagnosisCode",
    "POS",
    "TypeOfBill",
    "Modifier",
    "Minutes",
    "Billed_Amnt",
];

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub billing_rows: Vec<BillingRow>,
    pub processed_rows: usize,
    pub skipped_rows: usize,
}
