pub mod aggregator;
pub mod allowance;
pub mod call_record;
pub mod classifier;
pub mod engine;
pub mod pipeline;
pub mod tariff;

pub use crate::domain::model::{BillingReport, RawCallRecord};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
