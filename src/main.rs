use clap::error::ErrorKind;
use clap::Parser;
use phone_bill::utils::error::{BillingError, ErrorSeverity};
use phone_bill::utils::{logger, validation::Validate};
use phone_bill::{BillingEngine, CliConfig, CsvBillingPipeline, LocalStorage, RunSettings};

fn exit_with(e: &BillingError) -> ! {
    tracing::error!(
        "❌ Billing run failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match CliConfig::try_parse() {
        Ok(config) => config,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            // 參數數量錯誤：印出用法並以 1 結束
            let _ = e.print();
            std::process::exit(1);
        }
    };

    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting phone-bill CLI");
    tracing::debug!("CLI config: {:?}", config);

    let settings = match RunSettings::from_cli(&config) {
        Ok(settings) => settings,
        Err(e) => exit_with(&e),
    };

    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        exit_with(&e);
    }

    let pipeline = CsvBillingPipeline::new(LocalStorage::default(), settings);
    let engine = BillingEngine::new(pipeline);

    match engine.run().await {
        Ok(rendered) => {
            tracing::info!("✅ Billing run completed");
            println!("{}", rendered);
        }
        Err(e) => exit_with(&e),
    }

    Ok(())
}
