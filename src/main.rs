use clap::Parser;
use medbill_etl::core::ConfigProvider;
use medbill_etl::utils::{logger, validation::Validate};
use medbill_etl::{BillingPipeline, CliConfig, EtlEngine, LocalStorage, OllamaClient, TomlConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting medbill-etl");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let monitor_enabled = cli.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    // TOML 配置優先於 CLI 參數
    let config_file = cli.config.clone();
    let result = match &config_file {
        Some(config_path) => {
            tracing::info!("📁 Loading configuration from: {}", config_path);
            let config = match TomlConfig::from_file(config_path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", config_path, e);
                    eprintln!("💡 Make sure the file exists and is valid TOML format");
                    std::process::exit(1);
                }
            };
            run(config, monitor_enabled).await
        }
        None => run(cli, monitor_enabled).await,
    };

    match result {
        Ok(output_path) => {
            tracing::info!("✅ Billing extraction completed successfully!");
            tracing::info!("📁 Output saved to: {}", output_path);
            println!("✅ Billing extraction completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            // 記錄詳細錯誤信息
            tracing::error!(
                "❌ Billing extraction failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            // 輸出用戶友好的錯誤信息
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                medbill_etl::utils::error::ErrorSeverity::Low => 0,
                medbill_etl::utils::error::ErrorSeverity::Medium => 2,
                medbill_etl::utils::error::ErrorSeverity::High => 1,
                medbill_etl::utils::error::ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

async fn run<C>(config: C, monitor_enabled: bool) -> medbill_etl::Result<String>
where
    C: ConfigProvider + Validate + 'static,
{
    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    // 創建存儲、LLM 客戶端和管道
    let llm = OllamaClient::new(
        config.llm_endpoint(),
        config.llm_model(),
        config.llm_timeout_secs(),
    )?;
    let storage = LocalStorage::new(".".to_string());
    let pipeline = BillingPipeline::new(storage, config, llm);

    // 創建ETL引擎並運行
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);
    engine.run().await
}
