use crate::adapters::LocalStorage;
use crate::core::engine::BatchEngine;
use crate::core::pipeline::OptimizePipeline;
use crate::core::report::{self, BatchReport, RULE_WIDTH};
use crate::core::{BatchSummary, ConfigProvider, DryRunPlan};
use crate::utils::error::{OptimizeError, Result};
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub dry_run: bool,
    pub monitor: bool,
    pub strict: bool,
    pub report_path: Option<String>,
}

#[derive(Debug)]
pub enum RunOutcome {
    Planned(DryRunPlan),
    Completed(BatchSummary),
}

/// Runs (or plans) one batch against the local filesystem.
pub async fn execute<C: ConfigProvider + 'static>(
    config: C,
    options: &RunOptions,
) -> Result<RunOutcome> {
    let source_dir = config.source_dir().to_string();
    let output_dir = config.output_dir().to_string();

    let source = LocalStorage::new(source_dir.as_str());
    let output = LocalStorage::new(output_dir.as_str());

    // 來源不存在時直接失敗，不建立輸出目錄
    source.require_root()?;
    if !options.dry_run {
        output.ensure_root().await?;
    }

    let pipeline = OptimizePipeline::new(source, output, config);
    let settings = pipeline.settings();
    let engine = BatchEngine::new_with_monitoring(pipeline, options.monitor);

    if options.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be written");
        return Ok(RunOutcome::Planned(engine.plan().await?));
    }

    let summary = engine.run().await?;

    if let Some(path) = &options.report_path {
        BatchReport::new(&source_dir, &output_dir, settings, &summary).write_to(Path::new(path))?;
        tracing::info!("📝 Report written to {}", path);
    }

    Ok(RunOutcome::Completed(summary))
}

/// Prints progress around [`execute`] and maps the result to an exit code.
pub async fn run_batch<C: ConfigProvider + 'static>(config: C, options: RunOptions) -> i32 {
    println!("Starting image optimization...");
    println!("Source: {}", config.source_dir());
    println!("Destination: {}", config.output_dir());
    println!(
        "Settings: max width {}px, quality {}, extensions {}",
        config.max_width(),
        config.quality(),
        config.extensions().join(", ")
    );
    println!("{}", "-".repeat(RULE_WIDTH));

    match execute(config, &options).await {
        Ok(RunOutcome::Planned(plan)) => {
            for line in report::plan_lines(&plan) {
                println!("{}", line);
            }
            0
        }
        Ok(RunOutcome::Completed(summary)) => {
            for line in report::summary_lines(&summary) {
                println!("{}", line);
            }
            if options.strict && summary.has_errors() {
                2
            } else {
                0
            }
        }
        Err(e) => report_fatal(&e),
    }
}

pub fn report_fatal(e: &OptimizeError) -> i32 {
    tracing::error!(
        "❌ Image optimization failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    e.exit_code()
}
