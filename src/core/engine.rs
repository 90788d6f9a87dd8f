use crate::core::report;
use crate::core::{BatchSummary, ConversionStats, DryRunPlan, FileOutcome, ImageJob, Pipeline};
use crate::utils::error::Result;
use crate::utils::monitor::ResourceMonitor;

/// Drives a [`Pipeline`] over every job, one file at a time.
pub struct BatchEngine<P: Pipeline> {
    pipeline: P,
    monitor: ResourceMonitor,
}

impl<P: Pipeline> BatchEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: ResourceMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<BatchSummary> {
        tracing::info!("🔍 Scanning source tree...");
        let jobs = self.pipeline.extract().await?;
        tracing::info!("Found {} candidate images", jobs.len());
        self.monitor.log_stats("Extract");

        let mut summary = BatchSummary::default();
        for job in &jobs {
            let outcome = self.process(job).await;
            summary.record(job, outcome);
        }

        self.monitor.log_stats("Convert");
        self.monitor.log_final_stats();

        tracing::info!(
            "Batch finished: {} processed, {} skipped, {} errors",
            summary.processed,
            summary.skipped,
            summary.errors
        );
        Ok(summary)
    }

    /// Splits the candidate jobs without converting anything.
    pub async fn plan(&self) -> Result<DryRunPlan> {
        let jobs = self.pipeline.extract().await?;
        let mut plan = DryRunPlan::default();

        for job in jobs {
            if self.pipeline.is_converted(&job).await? {
                plan.already_converted.push(job);
            } else {
                plan.to_convert.push(job);
            }
        }

        Ok(plan)
    }

    async fn process(&self, job: &ImageJob) -> FileOutcome {
        let label = job.source_label();

        match self.pipeline.is_converted(job).await {
            Ok(true) => {
                tracing::info!("✓ Skipped (already exists): {}", label);
                return FileOutcome::Skipped;
            }
            Ok(false) => {}
            Err(e) => {
                tracing::error!("✗ Error processing {}: {}", label, e);
                return FileOutcome::Failed {
                    message: e.to_string(),
                };
            }
        }

        match self.convert(job).await {
            Ok(stats) => {
                tracing::info!("{}", report::processed_line(&label, &stats));
                FileOutcome::Converted(stats)
            }
            Err(e) => {
                tracing::error!("✗ Error processing {}: {}", label, e);
                FileOutcome::Failed {
                    message: e.to_string(),
                }
            }
        }
    }

    async fn convert(&self, job: &ImageJob) -> Result<ConversionStats> {
        let encoded = self.pipeline.transform(job).await?;
        self.pipeline.load(job, encoded).await
    }
}
