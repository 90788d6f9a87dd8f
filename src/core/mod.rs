pub mod convert;
pub mod engine;
pub mod pipeline;
pub mod report;

pub use crate::domain::model::{
    BatchSummary, ConversionSettings, ConversionStats, DryRunPlan, EncodedImage, FileOutcome,
    FileReport, ImageJob,
};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
