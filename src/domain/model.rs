use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One planned conversion. Both paths are relative to their storage root and
/// may hold names that are not valid UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageJob {
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl ImageJob {
    pub fn source_label(&self) -> String {
        display_relative(&self.source)
    }

    pub fn destination_label(&self) -> String {
        display_relative(&self.destination)
    }
}

/// `/`-joined form of a relative path for logs and reports. Invalid UTF-8 is
/// replaced with U+FFFD.
pub fn display_relative(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConversionSettings {
    pub max_width: u32,
    pub quality: f32,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            max_width: 1000,
            quality: 70.0,
        }
    }
}

/// Encoded output of a single file, held only until it is written.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub original_size: u64,
    pub original_dimensions: (u32, u32),
    pub final_dimensions: (u32, u32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionStats {
    pub original_size: u64,
    pub optimized_size: u64,
    pub original_dimensions: (u32, u32),
    pub final_dimensions: (u32, u32),
}

impl ConversionStats {
    pub fn resized(&self) -> bool {
        self.original_dimensions != self.final_dimensions
    }

    /// Negative when the WebP came out larger than the source.
    pub fn size_reduction_percent(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        (self.original_size as f64 - self.optimized_size as f64) / self.original_size as f64
            * 100.0
    }

    pub fn resize_info(&self) -> String {
        let (ow, oh) = self.original_dimensions;
        if self.resized() {
            let (nw, nh) = self.final_dimensions;
            format!("resized from {}x{} to {}x{}", ow, oh, nw, nh)
        } else {
            format!("kept original size {}x{}", ow, oh)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Converted(ConversionStats),
    Skipped,
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileReport {
    pub source: String,
    pub destination: String,
    pub outcome: FileOutcome,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    pub processed: usize,
    pub skipped: usize,
    pub errors: usize,
    pub files: Vec<FileReport>,
}

impl BatchSummary {
    pub fn record(&mut self, job: &ImageJob, outcome: FileOutcome) {
        match &outcome {
            FileOutcome::Converted(_) => self.processed += 1,
            FileOutcome::Skipped => self.skipped += 1,
            FileOutcome::Failed { .. } => self.errors += 1,
        }
        self.files.push(FileReport {
            source: job.source_label(),
            destination: job.destination_label(),
            outcome,
        });
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    pub fn total(&self) -> usize {
        self.processed + self.skipped + self.errors
    }

    pub fn bytes_saved(&self) -> i64 {
        self.files
            .iter()
            .filter_map(|f| match &f.outcome {
                FileOutcome::Converted(stats) => {
                    Some(stats.original_size as i64 - stats.optimized_size as i64)
                }
                _ => None,
            })
            .sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DryRunPlan {
    pub to_convert: Vec<ImageJob>,
    pub already_converted: Vec<ImageJob>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(original: u64, optimized: u64, from: (u32, u32), to: (u32, u32)) -> ConversionStats {
        ConversionStats {
            original_size: original,
            optimized_size: optimized,
            original_dimensions: from,
            final_dimensions: to,
        }
    }

    #[test]
    fn test_size_reduction_percent() {
        assert_eq!(stats(1000, 250, (1, 1), (1, 1)).size_reduction_percent(), 75.0);
        assert_eq!(stats(100, 150, (1, 1), (1, 1)).size_reduction_percent(), -50.0);
        assert_eq!(stats(0, 10, (1, 1), (1, 1)).size_reduction_percent(), 0.0);
    }

    #[test]
    fn test_resize_info() {
        let resized = stats(1, 1, (2000, 1500), (1000, 750));
        assert_eq!(resized.resize_info(), "resized from 2000x1500 to 1000x750");

        let kept = stats(1, 1, (640, 480), (640, 480));
        assert!(!kept.resized());
        assert_eq!(kept.resize_info(), "kept original size 640x480");
    }

    #[test]
    fn test_summary_counts() {
        let job = ImageJob {
            source: "a.png".into(),
            destination: "a.webp".into(),
        };
        let mut summary = BatchSummary::default();
        summary.record(&job, FileOutcome::Converted(stats(1000, 400, (1, 1), (1, 1))));
        summary.record(&job, FileOutcome::Skipped);
        summary.record(
            &job,
            FileOutcome::Failed {
                message: "bad header".to_string(),
            },
        );

        assert_eq!(summary.processed, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.total(), 3);
        assert!(summary.has_errors());
        assert_eq!(summary.bytes_saved(), 600);
    }

    #[test]
    fn test_labels_join_components_with_slash() {
        let job = ImageJob {
            source: Path::new("trips").join("2024").join("beach.jpg"),
            destination: Path::new("trips").join("2024").join("beach.webp"),
        };
        assert_eq!(job.source_label(), "trips/2024/beach.jpg");
        assert_eq!(job.destination_label(), "trips/2024/beach.webp");
    }

    #[cfg(unix)]
    #[test]
    fn test_label_of_non_utf8_name_is_lossy() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = Path::new("shots").join(OsStr::from_bytes(b"caf\xe9.png"));
        assert_eq!(display_relative(&path), "shots/caf\u{FFFD}.png");
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let json = serde_json::to_value(FileOutcome::Skipped).unwrap();
        assert_eq!(json["status"], "skipped");
    }
}
