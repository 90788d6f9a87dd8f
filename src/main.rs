use clap::Parser;
use image_optimize::utils::{logger, validation::Validate};
use image_optimize::{run_batch, CliConfig, RunOptions};

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting image-optimize");
    tracing::debug!("CLI config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    if config.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let options = RunOptions {
        dry_run: config.dry_run,
        monitor: config.monitor,
        strict: config.strict,
        report_path: config.report.clone(),
    };

    let exit_code = run_batch(config, options).await;
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}
