use crate::domain::model::{ConversionStats, EncodedImage, ImageJob};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// A rooted file tree. Paths are relative to the root.
pub trait Storage: Send + Sync {
    fn list_files(&self) -> impl std::future::Future<Output = Result<Vec<PathBuf>>> + Send;
    fn read_file(&self, path: &Path)
        -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &Path,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &Path) -> impl std::future::Future<Output = Result<bool>> + Send;
    fn display_path(&self, path: &Path) -> String;
}

pub trait ConfigProvider: Send + Sync {
    fn source_dir(&self) -> &str;
    fn output_dir(&self) -> &str;
    fn max_width(&self) -> u32;
    fn quality(&self) -> f32;
    fn extensions(&self) -> &[String];
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<ImageJob>>;
    async fn is_converted(&self, job: &ImageJob) -> Result<bool>;
    async fn transform(&self, job: &ImageJob) -> Result<EncodedImage>;
    async fn load(&self, job: &ImageJob, image: EncodedImage) -> Result<ConversionStats>;
}
