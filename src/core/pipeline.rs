use crate::core::aggregator::BillingAggregator;
use crate::core::allowance::AllowanceTracker;
use crate::core::call_record::CallRecord;
use crate::core::{BillingReport, ConfigProvider, Pipeline, RawCallRecord, Storage};
use crate::utils::error::{BillingError, Result};
use serde::Serialize;

/// 讀取 CSV 通話紀錄檔、計費並輸出最貴號碼
pub struct CsvBillingPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> CsvBillingPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }
}

fn render<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(rendered)
}

/// 引號不具特殊意義，欄位就是單純以逗號切開的結果
fn split_fields(line: &[u8]) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_reader(line);

    let mut row = csv::StringRecord::new();
    reader.read_record(&mut row)?;
    Ok(row.iter().map(str::to_string).collect())
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for CsvBillingPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<RawCallRecord>> {
        let path = self.config.log_path();
        tracing::debug!("Reading call log from: {}", path);
        let data = self.storage.read_file(path).await?;

        // 逐行處理以保留實際行號；只有空白字元的行視為空行
        let mut records = Vec::new();
        for (index, line) in data.split(|&b| b == b'\n').enumerate() {
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }

            records.push(RawCallRecord {
                line_number: index as u64 + 1,
                fields: split_fields(line)?,
            });
        }

        tracing::debug!("Read {} call records", records.len());
        Ok(records)
    }

    async fn transform(&self, data: Vec<RawCallRecord>) -> Result<BillingReport> {
        // 每次執行都用新的免費分鐘餘額，並嚴格依檔案順序扣除
        let mut allowance = AllowanceTracker::with_limits(self.config.allowance_limits());
        let mut aggregator = BillingAggregator::new();

        for raw in data {
            let record = CallRecord::from_raw(&raw, &mut allowance).map_err(|source| {
                tracing::error!("Failed to parse line {}: {}", raw.line_number, source);
                BillingError::ParseAt {
                    line_number: raw.line_number,
                    source,
                }
            })?;

            tracing::trace!(
                "Line {}: {} ({}) {} min, {} free, cost {}",
                raw.line_number,
                record.number().as_str(),
                record.category(),
                record.duration_minutes(),
                record.free_minutes(),
                record.cost().0
            );
            aggregator.add(&record);
        }

        Ok(BillingReport {
            most_expensive: aggregator.most_expensive(),
            totals: aggregator.ranked(),
            records_processed: aggregator.records_seen(),
        })
    }

    async fn load(&self, report: BillingReport) -> Result<String> {
        let symbol = self.config.currency_symbol();
        let pretty = self.config.pretty();

        let rendered = if self.config.summary() {
            render(&report.summary(symbol), pretty)?
        } else {
            render(&report.most_expensive_entry(symbol), pretty)?
        };

        if let Some(output_path) = self.config.output_path() {
            tracing::debug!("Writing result ({} bytes) to {}", rendered.len(), output_path);
            self.storage
                .write_file(output_path, rendered.as_bytes())
                .await?;
        }

        Ok(rendered)
    }
}
