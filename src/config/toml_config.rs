use crate::core::allowance::AllowanceLimits;
use crate::utils::error::{BillingError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

/// 一個月的分鐘數，免費額度不得超過
pub const MAX_ALLOWANCE_MINUTES: u64 = 31 * 24 * 60;

static ENV_VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TomlConfig {
    pub report: Option<ReportConfig>,
    pub allowance: Option<AllowanceConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    pub currency_symbol: Option<String>,
    pub summary: Option<bool>,
    pub pretty: Option<bool>,
    pub output_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceConfig {
    pub international_minutes: Option<u64>,
    pub landline_mobile_minutes: Option<u64>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(BillingError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| BillingError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${BILL_CURRENCY})，找不到的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_PATTERN
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn currency_symbol(&self) -> Option<&str> {
        self.report.as_ref()?.currency_symbol.as_deref()
    }

    pub fn summary(&self) -> Option<bool> {
        self.report.as_ref()?.summary
    }

    pub fn pretty(&self) -> Option<bool> {
        self.report.as_ref()?.pretty
    }

    pub fn output_path(&self) -> Option<&str> {
        self.report.as_ref()?.output_path.as_deref()
    }

    /// 未設定的欄位使用預設的 10 / 100 分鐘
    pub fn allowance_limits(&self) -> AllowanceLimits {
        let defaults = AllowanceLimits::default();
        match &self.allowance {
            Some(allowance) => AllowanceLimits {
                international_minutes: allowance
                    .international_minutes
                    .unwrap_or(defaults.international_minutes),
                landline_mobile_minutes: allowance
                    .landline_mobile_minutes
                    .unwrap_or(defaults.landline_mobile_minutes),
            },
            None => defaults,
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(symbol) = self.currency_symbol() {
            validation::validate_non_empty_string("report.currency_symbol", symbol)?;
        }
        if let Some(path) = self.output_path() {
            validation::validate_path("report.output_path", path)?;
        }

        let limits = self.allowance_limits();
        validation::validate_range(
            "allowance.international_minutes",
            limits.international_minutes,
            0,
            MAX_ALLOWANCE_MINUTES,
        )?;
        validation::validate_range(
            "allowance.landline_mobile_minutes",
            limits.landline_mobile_minutes,
            0,
            MAX_ALLOWANCE_MINUTES,
        )?;

        Ok(())
    }
}
