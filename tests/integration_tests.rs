use httpmock::prelude::*;
use medbill_etl::{BillingPipeline, CliConfig, EtlEngine, LocalStorage, OllamaClient};
use tempfile::TempDir;

fn test_config(server: &MockServer, input_path: &str, output_path: &str) -> CliConfig {
    CliConfig {
        ollama_endpoint: server.base_url(),
        model: "llama3.1".to_string(),
        llm_timeout_secs: 30,
        input_path: input_path.to_string(),
        output_path: output_path.to_string(),
        output_filename: "billing_output.csv".to_string(),
        request_delay_ms: 0,
        config: None,
        verbose: false,
        monitor: false,
    }
}

fn read_output(output_path: &str) -> Vec<csv::StringRecord> {
    let path = std::path::Path::new(output_path).join("billing_output.csv");
    assert!(path.exists(), "output CSV was not written");

    let mut reader = csv::Reader::from_path(path).unwrap();
    assert_eq!(
        reader.headers().unwrap(),
        &csv::StringRecord::from(vec![
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
        ])
    );
    reader.records().map(|r| r.unwrap()).collect()
}

#[tokio::test]
async fn test_end_to_end_range_fan_out() {
    let temp_dir = TempDir::new().unwrap();
    let input_path = temp_dir.path().join("input.csv");
    let output_path = temp_dir.path().join("out").to_str().unwrap().to_string();

    std::fs::write(
        &input_path,
        "SERVICE_CATEGORY_NAME,DEFINITION\nConsults,Office consults 100 to 102 for females 18-65\n",
    )
    .unwrap();

    let server = MockServer::start();
    let llm_response = serde_json::json!({
        "response": r#"{"serviceCodes":["100-102"],"diagnosisCodes":["X1","X2"],"revenueCodes":[],"modifier":"M1","pos":["11"],"typeOfBill":"131","gender":"F","minAge":"18","maxAge":"65"}"#
    });
    let generate_mock = server.mock(|when, then| {
        when.method(POST).path("/api/generate");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(llm_response);
    });

    let config = test_config(&server, input_path.to_str().unwrap(), &output_path);
    let llm = OllamaClient::new(&config.ollama_endpoint, &config.model, 30).unwrap();
    let pipeline = BillingPipeline::new(LocalStorage::new(".".to_string()), config, llm);
    let engine = EtlEngine::new(pipeline);

    let result_path = engine.run().await.unwrap();

    generate_mock.assert_hits(1);
    assert!(result_path.ends_with("billing_output.csv"));

    let records = read_output(&output_path);
    assert_eq!(records.len(), 3);

    let service_codes: Vec<&str> = records.iter().map(|r| &r[1]).collect();
    assert_eq!(service_codes, vec!["100", "101", "102"]);

    for record in &records {
        assert_eq!(&record[0], "Consults");
        assert_eq!(&record[2], ""); // RevenueCode
        assert_eq!(&record[3], "F");
        assert_eq!(&record[4], "18-65");
        assert_eq!(&record[5], "X1,X2");
        assert_eq!(&record[6], "11");
        assert_eq!(&record[7], "131");
        assert_eq!(&record[8], "M1");
        assert_eq!(&record[9], "1");
        assert_eq!(&record[10], "100");
    }
}

#[tokio::test]
async fn test_end_to_end_malformed_response_writes_header_only() {
    let temp_dir = TempDir::new().unwrap();
    let input_path = temp_dir.path().join("input.csv");
    let output_path = temp_dir.path().join("out").to_str().unwrap().to_string();

    std::fs::write(
        &input_path,
        "SERVICE_CATEGORY_NAME,DEFINITION\nConsults,some definition\n",
    )
    .unwrap();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/generate");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"response": "I am not able to produce JSON, sorry."}));
    });

    let config = test_config(&server, input_path.to_str().unwrap(), &output_path);
    let llm = OllamaClient::new(&config.ollama_endpoint, &config.model, 30).unwrap();
    let pipeline = BillingPipeline::new(LocalStorage::new(".".to_string()), config, llm);

    // the bad row is skipped, the run still completes and writes the header
    let result = EtlEngine::new(pipeline).run().await;
    assert!(result.is_ok());

    let records = read_output(&output_path);
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_end_to_end_mixed_rows_row_count_accounting() {
    let temp_dir = TempDir::new().unwrap();
    let input_path = temp_dir.path().join("input.csv");
    let output_path = temp_dir.path().join("out").to_str().unwrap().to_string();

    std::fs::write(
        &input_path,
        "SERVICE_CATEGORY_NAME,DEFINITION\n\
         Consults,first definition\n\
         Labs,second definition\n\
         Imaging,third definition\n",
    )
    .unwrap();

    let server = MockServer::start();
    // one mock per row, matched on the definition text inside the prompt
    let first = server.mock(|when, then| {
        when.method(POST)
            .path("/api/generate")
            .body_contains("first definition");
        then.status(200).json_body(serde_json::json!({
            "response": r#"{"serviceCodes":["10","11"],"diagnosisCodes":["D1"]}"#
        }));
    });
    let second = server.mock(|when, then| {
        when.method(POST)
            .path("/api/generate")
            .body_contains("second definition");
        then.status(500);
    });
    let third = server.mock(|when, then| {
        when.method(POST)
            .path("/api/generate")
            .body_contains("third definition");
        then.status(200).json_body(serde_json::json!({
            "response": "```json\n{\"serviceCodes\":[\"200-202\"]}\n```"
        }));
    });

    let config = test_config(&server, input_path.to_str().unwrap(), &output_path);
    let llm = OllamaClient::new(&config.ollama_endpoint, &config.model, 30).unwrap();
    let pipeline = BillingPipeline::new(LocalStorage::new(".".to_string()), config, llm);

    EtlEngine::new(pipeline).run().await.unwrap();

    first.assert_hits(1);
    second.assert_hits(1);
    third.assert_hits(1);

    // 2 codes from the first row + 3 from the third; the failed row adds none
    let records = read_output(&output_path);
    assert_eq!(records.len(), 5);

    let categories: Vec<&str> = records.iter().map(|r| &r[0]).collect();
    assert_eq!(
        categories,
        vec!["Consults", "Consults", "Imaging", "Imaging", "Imaging"]
    );
    assert_eq!(&records[0][5], "D1");
    assert_eq!(&records[2][1], "200");
    assert_eq!(&records[4][1], "202");
}

#[tokio::test]
async fn test_end_to_end_missing_input_fails() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("out").to_str().unwrap().to_string();

    let server = MockServer::start();
    let config = test_config(&server, "/does/not/exist.csv", &output_path);
    let llm = OllamaClient::new(&config.ollama_endpoint, &config.model, 30).unwrap();
    let pipeline = BillingPipeline::new(LocalStorage::new(".".to_string()), config, llm);

    let result = EtlEngine::new(pipeline).run().await;
    assert!(result.is_err());
}
