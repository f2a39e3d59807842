pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, RunSettings};

pub use crate::core::aggregator::{find_most_expensive, BillingAggregator};
pub use crate::core::allowance::{AllowanceLimits, AllowanceTracker};
pub use crate::core::call_record::CallRecord;
pub use crate::core::classifier::{classify, PhoneNumber};
pub use crate::core::tariff::{Tariff, TariffTable};
pub use crate::core::{engine::BillingEngine, pipeline::CsvBillingPipeline};
pub use domain::model::{BillingReport, Direction, NumberCategory, Pence};
pub use utils::error::{BillingError, ParseError, Result};
