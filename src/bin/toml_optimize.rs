use clap::Parser;
use image_optimize::core::ConfigProvider;
use image_optimize::utils::{logger, validation::Validate};
use image_optimize::{run_batch, RunOptions, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-optimize")]
#[command(about = "Image optimizer driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "optimize.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override conversion.quality from config
    #[arg(long)]
    quality: Option<f32>,

    /// Override conversion.max_width from config
    #[arg(long)]
    max_width: Option<u32>,

    /// Override output.report from config
    #[arg(long)]
    report: Option<String>,

    /// Exit with code 2 when any file fails to convert
    #[arg(long)]
    strict: bool,

    /// Dry run - show what would be processed without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 日誌格式由配置決定，需在載入配置之後初始化
    if config.log_format() == Some("json") {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting TOML-based image optimizer");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(quality) = args.quality {
        config.conversion.quality = quality;
        tracing::info!("🔧 Quality overridden to: {}", quality);
    }
    if let Some(max_width) = args.max_width {
        config.conversion.max_width = max_width;
        tracing::info!("🔧 Max width overridden to: {}", max_width);
    }
    if let Some(report) = &args.report {
        config.output.report = Some(report.clone());
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config, &args);

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let options = RunOptions {
        dry_run: args.dry_run,
        monitor: monitor_enabled,
        strict: args.strict,
        report_path: config.report_path().map(str::to_string),
    };

    let exit_code = run_batch(config, options).await;
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Source: {}", config.source_dir());
    println!("  Output: {}", config.output_dir());
    println!("  Max Width: {}px", config.max_width());
    println!("  Quality: {}", config.quality());
    println!("  Extensions: {}", config.extensions().join(", "));

    if let Some(report) = config.report_path() {
        println!("  Report: {}", report);
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}
