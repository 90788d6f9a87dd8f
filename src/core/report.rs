use crate::core::{BatchSummary, ConversionSettings, ConversionStats, DryRunPlan};
use crate::utils::error::Result;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::Path;

pub const RULE_WIDTH: usize = 50;

#[derive(Debug, Serialize)]
pub struct BatchReport<'a> {
    pub generated_at: DateTime<Local>,
    pub source_dir: &'a str,
    pub output_dir: &'a str,
    pub settings: ConversionSettings,
    #[serde(flatten)]
    pub summary: &'a BatchSummary,
}

impl<'a> BatchReport<'a> {
    pub fn new(
        source_dir: &'a str,
        output_dir: &'a str,
        settings: ConversionSettings,
        summary: &'a BatchSummary,
    ) -> Self {
        Self {
            generated_at: Local::now(),
            source_dir,
            output_dir,
            settings,
            summary,
        }
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

fn kilobytes(bytes: u64) -> f64 {
    bytes as f64 / 1024.0
}

pub fn processed_line(source: &str, stats: &ConversionStats) -> String {
    format!(
        "✓ Processed: {} ({}) - Size: {:.1}KB → {:.1}KB ({:.1}% reduction)",
        source,
        stats.resize_info(),
        kilobytes(stats.original_size),
        kilobytes(stats.optimized_size),
        stats.size_reduction_percent()
    )
}

pub fn summary_lines(summary: &BatchSummary) -> Vec<String> {
    let mut lines = vec![
        "-".repeat(RULE_WIDTH),
        "Optimization complete!".to_string(),
        format!("Processed: {} images", summary.processed),
        format!("Skipped: {} images (already optimized)", summary.skipped),
        format!("Errors: {} images", summary.errors),
        format!("Space saved: {:.1}KB", summary.bytes_saved() as f64 / 1024.0),
    ];

    if summary.has_errors() {
        lines.push(String::new());
        lines.push(format!(
            "Note: {} images could not be processed. Check the errors above.",
            summary.errors
        ));
    }

    lines
}

pub fn plan_lines(plan: &DryRunPlan) -> Vec<String> {
    let mut lines = Vec::with_capacity(plan.to_convert.len() + plan.already_converted.len() + 3);

    for job in &plan.to_convert {
        lines.push(format!(
            "→ Would convert: {} -> {}",
            job.source_label(),
            job.destination_label()
        ));
    }
    for job in &plan.already_converted {
        lines.push(format!("✓ Would skip (already exists): {}", job.source_label()));
    }

    lines.push("-".repeat(RULE_WIDTH));
    lines.push(format!(
        "Dry run: {} to convert, {} already optimized",
        plan.to_convert.len(),
        plan.already_converted.len()
    ));
    lines
}
