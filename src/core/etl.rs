use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("🚀 Starting billing extraction run");

        tracing::info!("Reading definitions...");
        let rows = self.pipeline.extract().await?;
        tracing::info!("📄 Loaded {} definition rows", rows.len());
        self.monitor.log_stats("extract");

        tracing::info!("Extracting and exploding rows...");
        let result = self.pipeline.transform(rows).await?;
        tracing::info!(
            "🔄 Produced {} billing rows ({} rows processed, {} skipped)",
            result.billing_rows.len(),
            result.processed_rows,
            result.skipped_rows
        );
        self.monitor.log_stats("transform");

        tracing::info!("Writing output table...");
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("💾 Output saved to: {}", output_path);
        self.monitor.log_final_stats();

        Ok(output_path)
    }
}
