use crate::core::allowance::AllowanceLimits;
use crate::domain::model::{BillingReport, RawCallRecord};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn log_path(&self) -> &str;
    fn output_path(&self) -> Option<&str>;
    fn currency_symbol(&self) -> &str;
    fn allowance_limits(&self) -> AllowanceLimits;
    fn summary(&self) -> bool;
    fn pretty(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<RawCallRecord>>;
    async fn transform(&self, data: Vec<RawCallRecord>) -> Result<BillingReport>;
    async fn load(&self, report: BillingReport) -> Result<String>;
}
