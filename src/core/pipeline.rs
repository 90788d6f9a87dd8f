use crate::core::convert;
use crate::core::{
    ConfigProvider, ConversionSettings, ConversionStats, EncodedImage, ImageJob, Pipeline, Storage,
};
use crate::utils::error::Result;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Lower-cased extension of the last path segment. Dot-files such as
/// `.png` have no extension.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
}

/// Mirrors `source` with its final extension replaced by `webp`.
pub fn destination_for(source: &Path) -> PathBuf {
    source.with_extension("webp")
}

pub struct OptimizePipeline<S: Storage, C: ConfigProvider> {
    source: S,
    output: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> OptimizePipeline<S, C> {
    pub fn new(source: S, output: S, config: C) -> Self {
        Self {
            source,
            output,
            config,
        }
    }

    pub fn settings(&self) -> ConversionSettings {
        ConversionSettings {
            max_width: self.config.max_width(),
            quality: self.config.quality(),
        }
    }

    fn allowed_extensions(&self) -> HashSet<String> {
        self.config
            .extensions()
            .iter()
            .map(|ext| ext.trim().to_ascii_lowercase())
            .collect()
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for OptimizePipeline<S, C> {
    async fn extract(&self) -> Result<Vec<ImageJob>> {
        let allowed = self.allowed_extensions();
        let files = self.source.list_files().await?;
        tracing::debug!("Source tree contains {} files", files.len());

        let jobs: Vec<ImageJob> = files
            .into_iter()
            .filter(|path| {
                extension_of(path)
                    .map(|ext| allowed.contains(&ext))
                    .unwrap_or(false)
            })
            .map(|source| ImageJob {
                destination: destination_for(&source),
                source,
            })
            .collect();

        Ok(jobs)
    }

    async fn is_converted(&self, job: &ImageJob) -> Result<bool> {
        self.output.exists(&job.destination).await
    }

    async fn transform(&self, job: &ImageJob) -> Result<EncodedImage> {
        let bytes = self.source.read_file(&job.source).await?;
        let settings = self.settings();

        // 解碼與編碼屬於 CPU 密集工作，放到 blocking pool 執行
        tokio::task::spawn_blocking(move || convert::convert_image(&bytes, settings)).await?
    }

    async fn load(&self, job: &ImageJob, image: EncodedImage) -> Result<ConversionStats> {
        tracing::debug!(
            "Writing {} bytes to {}",
            image.bytes.len(),
            self.output.display_path(&job.destination)
        );
        self.output.write_file(&job.destination, &image.bytes).await?;

        Ok(ConversionStats {
            original_size: image.original_size,
            optimized_size: image.bytes.len() as u64,
            original_dimensions: image.original_dimensions,
            final_dimensions: image.final_dimensions,
        })
    }
}
