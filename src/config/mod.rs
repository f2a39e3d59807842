pub mod cli;
pub mod toml_config;

use crate::core::allowance::AllowanceLimits;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use toml_config::{TomlConfig, MAX_ALLOWANCE_MINUTES};

#[cfg(feature = "cli")]
use clap::Parser;

pub const DEFAULT_CURRENCY_SYMBOL: &str = "£";

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "phone-bill", version)]
#[command(about = "Find the most expensive number in a call log")]
pub struct CliConfig {
    /// Path to the call log (<number>,<start time>,<MM:SS>,<INCOMING|OUTGOING>)
    pub log_path: String,

    /// Optional TOML settings file
    #[arg(long)]
    pub config: Option<String>,

    /// Currency symbol used in TotalAmount
    #[arg(long)]
    pub currency: Option<String>,

    #[arg(long, help = "Print every number's total, not just the most expensive")]
    pub summary: bool,

    #[arg(long, help = "Pretty-print the JSON result")]
    pub pretty: bool,

    /// Also write the result to this file
    #[arg(long)]
    pub output: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

/// CLI 參數與 TOML 設定合併後的執行設定；CLI 優先
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub log_path: String,
    pub output_path: Option<String>,
    pub currency_symbol: String,
    pub allowance: AllowanceLimits,
    pub summary: bool,
    pub pretty: bool,
}

impl RunSettings {
    pub fn new(log_path: impl Into<String>) -> Self {
        Self {
            log_path: log_path.into(),
            output_path: None,
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            allowance: AllowanceLimits::default(),
            summary: false,
            pretty: false,
        }
    }

    pub fn with_file_config(mut self, file: &TomlConfig) -> Self {
        if let Some(symbol) = file.currency_symbol() {
            self.currency_symbol = symbol.to_string();
        }
        if let Some(path) = file.output_path() {
            self.output_path = Some(path.to_string());
        }
        self.summary = file.summary().unwrap_or(self.summary);
        self.pretty = file.pretty().unwrap_or(self.pretty);
        self.allowance = file.allowance_limits();
        self
    }

    #[cfg(feature = "cli")]
    pub fn from_cli(cli: &CliConfig) -> Result<Self> {
        let mut settings = Self::new(cli.log_path.clone());

        if let Some(config_path) = &cli.config {
            tracing::debug!("Loading settings from: {}", config_path);
            let file = TomlConfig::from_file(config_path)?;
            file.validate()?;
            settings = settings.with_file_config(&file);
        }

        if let Some(symbol) = &cli.currency {
            settings.currency_symbol = symbol.clone();
        }
        if let Some(output) = &cli.output {
            settings.output_path = Some(output.clone());
        }
        settings.summary |= cli.summary;
        settings.pretty |= cli.pretty;

        Ok(settings)
    }
}

impl Validate for RunSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_path("log_path", &self.log_path)?;
        if let Some(output) = &self.output_path {
            validation::validate_path("output", output)?;
        }
        validation::validate_non_empty_string("currency", &self.currency_symbol)?;
        validation::validate_range(
            "allowance.international_minutes",
            self.allowance.international_minutes,
            0,
            MAX_ALLOWANCE_MINUTES,
        )?;
        validation::validate_range(
            "allowance.landline_mobile_minutes",
            self.allowance.landline_mobile_minutes,
            0,
            MAX_ALLOWANCE_MINUTES,
        )?;
        Ok(())
    }
}

impl ConfigProvider for RunSettings {
    fn log_path(&self) -> &str {
        &self.log_path
    }

    fn output_path(&self) -> Option<&str> {
        self.output_path.as_deref()
    }

    fn currency_symbol(&self) -> &str {
        &self.currency_symbol
    }

    fn allowance_limits(&self) -> AllowanceLimits {
        self.allowance
    }

    fn summary(&self) -> bool {
        self.summary
    }

    fn pretty(&self) -> bool {
        self.pretty
    }
}
