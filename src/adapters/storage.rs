use crate::core::Storage;
use crate::utils::error::{OptimizeError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Fails with `SourceNotFound` unless the root is an existing directory.
    pub fn require_root(&self) -> Result<()> {
        require_dir(&self.base_path)
    }

    pub async fn ensure_root(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.base_path).await?;
        Ok(())
    }

    fn full_path(&self, path: &Path) -> PathBuf {
        self.base_path.join(path)
    }
}

fn require_dir(root: &Path) -> Result<()> {
    if root.is_dir() {
        Ok(())
    } else {
        Err(OptimizeError::SourceNotFound {
            path: root.display().to_string(),
        })
    }
}

/// Regular files under `root` in file-name order, relative to `root`.
/// Unreadable entries are logged and left out.
fn walk_files(root: &Path) -> Result<Vec<PathBuf>> {
    require_dir(root)?;

    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        // 跟隨符號連結判斷是否為一般檔案
        if !entry.path().is_file() {
            continue;
        }

        if let Ok(relative) = entry.path().strip_prefix(root) {
            files.push(relative.to_path_buf());
        }
    }

    Ok(files)
}

impl Storage for LocalStorage {
    async fn list_files(&self) -> Result<Vec<PathBuf>> {
        let root = self.base_path.clone();
        tokio::task::spawn_blocking(move || walk_files(&root)).await?
    }

    async fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        let data = tokio::fs::read(self.full_path(path)).await?;
        Ok(data)
    }

    async fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        let full_path = self.full_path(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(full_path, data).await?;
        Ok(())
    }

    async fn exists(&self, path: &Path) -> Result<bool> {
        Ok(tokio::fs::try_exists(self.full_path(path)).await?)
    }

    fn display_path(&self, path: &Path) -> String {
        self.full_path(path).display().to_string()
    }
}
