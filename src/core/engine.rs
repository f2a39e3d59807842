use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct BillingEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> BillingEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// 依序執行 extract → transform → load，回傳輸出的 JSON
    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting billing run");

        let raw_records = self.pipeline.extract().await?;
        tracing::info!("Extracted {} call records", raw_records.len());

        let report = self.pipeline.transform(raw_records).await?;
        match &report.most_expensive {
            Some((number, total)) => tracing::info!(
                "Priced {} calls across {} numbers, most expensive {} ({} pence)",
                report.records_processed,
                report.totals.len(),
                number,
                total.0
            ),
            None => tracing::info!(
                "Priced {} calls across {} numbers, no single most expensive number",
                report.records_processed,
                report.totals.len()
            ),
        }

        let rendered = self.pipeline.load(report).await?;
        tracing::debug!("Rendered result: {}", rendered);

        Ok(rendered)
    }
}
