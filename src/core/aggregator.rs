use std::collections::HashMap;

use crate::core::call_record::CallRecord;
use crate::domain::model::Pence;

/// 依正規化後的號碼字串累計費用（類別不屬於 key）
#[derive(Debug, Default)]
pub struct BillingAggregator {
    totals: HashMap<String, Pence>,
    records_seen: usize,
}

impl BillingAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, record: &CallRecord) {
        let cost = record.cost();
        let total = self
            .totals
            .entry(record.number().as_str().to_string())
            .or_default();
        total.0 = total.0.saturating_add(cost.0);
        self.records_seen += 1;
    }

    pub fn records_seen(&self) -> usize {
        self.records_seen
    }

    /// 費用由高到低；同額時依號碼排序，讓輸出穩定
    pub fn ranked(&self) -> Vec<(String, Pence)> {
        let mut entries: Vec<(String, Pence)> = self
            .totals
            .iter()
            .map(|(number, total)| (number.clone(), *total))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries
    }

    /// 最高總額為零或前兩名同額時沒有結果
    pub fn most_expensive(&self) -> Option<(String, Pence)> {
        let ranked = self.ranked();
        let mut iter = ranked.into_iter();
        let top = iter.next()?;

        if top.1 == Pence(0) {
            return None;
        }
        if let Some(runner_up) = iter.next() {
            if runner_up.1 == top.1 {
                tracing::debug!(
                    "Tie between {} and {} at {} pence, no single most expensive number",
                    top.0,
                    runner_up.0,
                    top.1.0
                );
                return None;
            }
        }
        Some(top)
    }
}

/// 依來源順序走訪一次並回傳費用最高的號碼
pub fn find_most_expensive<I>(records: I) -> Option<(String, Pence)>
where
    I: IntoIterator<Item = CallRecord>,
{
    let mut aggregator = BillingAggregator::new();
    for record in records {
        aggregator.add(&record);
    }
    aggregator.most_expensive()
}
