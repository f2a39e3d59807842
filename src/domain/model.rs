use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::ParseError;

/// 號碼類別，決定費率與免費分鐘池
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumberCategory {
    International,
    Landline,
    Mobile,
    FreePhone,
    Invalid,
}

/// 共用同一個免費分鐘池的類別群組
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AllowanceClass {
    International,
    LandlineMobile,
}

impl NumberCategory {
    pub fn allowance_class(self) -> Option<AllowanceClass> {
        match self {
            NumberCategory::International => Some(AllowanceClass::International),
            NumberCategory::Landline | NumberCategory::Mobile => {
                Some(AllowanceClass::LandlineMobile)
            }
            NumberCategory::FreePhone | NumberCategory::Invalid => None,
        }
    }
}

impl fmt::Display for NumberCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NumberCategory::International => "international",
            NumberCategory::Landline => "landline",
            NumberCategory::Mobile => "mobile",
            NumberCategory::FreePhone => "freephone",
            NumberCategory::Invalid => "invalid",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Incoming,
    Outgoing,
}

impl FromStr for Direction {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INCOMING" => Ok(Direction::Incoming),
            "OUTGOING" => Ok(Direction::Outgoing),
            other => Err(ParseError::Direction(other.to_string())),
        }
    }
}

/// 通話紀錄檔中的一行，已依逗號切開但尚未解析
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCallRecord {
    /// 檔案中的實際行號（從 1 起算，空行也計入）
    pub line_number: u64,
    pub fields: Vec<String>,
}

impl RawCallRecord {
    pub fn line(&self) -> String {
        self.fields.join(",")
    }
}

/// 以最小貨幣單位（便士）計算的金額
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Pence(pub u64);

impl Pence {
    /// 轉成 `£3.900000` 這種格式，小數固定六位
    pub fn format_with(self, currency_symbol: &str) -> String {
        format!("{}{}.{:02}0000", currency_symbol, self.0 / 100, self.0 % 100)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NumberTotal {
    #[serde(rename = "PhoneNumber")]
    pub phone_number: String,
    #[serde(rename = "TotalAmount")]
    pub total_amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BillingSummary {
    #[serde(rename = "MostExpensive")]
    pub most_expensive: Option<NumberTotal>,
    #[serde(rename = "Totals")]
    pub totals: Vec<NumberTotal>,
    #[serde(rename = "RecordsProcessed")]
    pub records_processed: usize,
}

/// transform 階段的結果，load 階段再決定輸出格式
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillingReport {
    pub most_expensive: Option<(String, Pence)>,
    pub totals: Vec<(String, Pence)>,
    pub records_processed: usize,
}

impl BillingReport {
    pub fn most_expensive_entry(&self, currency_symbol: &str) -> Option<NumberTotal> {
        self.most_expensive
            .as_ref()
            .map(|(number, total)| NumberTotal {
                phone_number: number.clone(),
                total_amount: total.format_with(currency_symbol),
            })
    }

    pub fn summary(&self, currency_symbol: &str) -> BillingSummary {
        BillingSummary {
            most_expensive: self.most_expensive_entry(currency_symbol),
            totals: self
                .totals
                .iter()
                .map(|(number, total)| NumberTotal {
                    phone_number: number.clone(),
                    total_amount: total.format_with(currency_symbol),
                })
                .collect(),
            records_processed: self.records_processed,
        }
    }
}
