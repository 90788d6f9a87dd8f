#![cfg(feature = "cli")]

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use image_optimize::config::default_extensions;
use image_optimize::core::FileOutcome;
use image_optimize::{execute, CliConfig, OptimizeError, RunOptions, RunOutcome};
use std::path::Path;
use tempfile::TempDir;

fn cli_config(source: &Path, output: &Path) -> CliConfig {
    CliConfig {
        source_dir: source.to_str().unwrap().to_string(),
        output_dir: output.to_str().unwrap().to_string(),
        max_width: 1000,
        quality: 70.0,
        extensions: default_extensions(),
        dry_run: false,
        report: None,
        strict: false,
        verbose: false,
        monitor: false,
        log_json: false,
    }
}

fn save(img: &DynamicImage, path: &Path, format: ImageFormat) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    img.save_with_format(path, format).unwrap();
}

fn completed(outcome: RunOutcome) -> image_optimize::core::BatchSummary {
    match outcome {
        RunOutcome::Completed(summary) => summary,
        RunOutcome::Planned(_) => panic!("expected a completed run"),
    }
}

/// Source tree used by most tests:
///
/// ```text
/// images/
///   wide.png            1600x800 RGB
///   nested/small.jpg    120x80 RGB
///   nested/clear.png    40x40 fully transparent
///   notes.txt           ignored
/// ```
fn build_source_tree(root: &Path) {
    let wide = DynamicImage::ImageRgb8(RgbImage::from_pixel(1600, 800, Rgb([30, 60, 90])));
    save(&wide, &root.join("wide.png"), ImageFormat::Png);

    let small = DynamicImage::ImageRgb8(RgbImage::from_pixel(120, 80, Rgb([200, 10, 10])));
    save(&small, &root.join("nested/small.jpg"), ImageFormat::Jpeg);

    let clear = DynamicImage::ImageRgba8(RgbaImage::from_pixel(40, 40, Rgba([0, 0, 0, 0])));
    save(&clear, &root.join("nested/clear.png"), ImageFormat::Png);

    std::fs::write(root.join("notes.txt"), "not an image").unwrap();
}

#[tokio::test]
async fn test_end_to_end_conversion() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let source = temp_dir.path().join("images");
    let output = temp_dir.path().join("optimized").join("images");
    build_source_tree(&source);

    let summary = completed(execute(cli_config(&source, &output), &RunOptions::default()).await?);

    assert_eq!(summary.processed, 3);
    assert_eq!(summary.skipped, 0);
    assert_eq!(summary.errors, 0);

    // 鏡像目錄結構，副檔名改為 .webp
    let wide = image::open(output.join("wide.webp"))?;
    assert_eq!((wide.width(), wide.height()), (1000, 500));

    let small = image::open(output.join("nested/small.webp"))?;
    assert_eq!((small.width(), small.height()), (120, 80));

    let clear = image::open(output.join("nested/clear.webp"))?.to_rgb8();
    assert!(clear.get_pixel(20, 20).0.iter().all(|&c| c > 240));

    assert!(!output.join("notes.webp").exists());
    assert!(!output.join("notes.txt").exists());

    Ok(())
}

#[tokio::test]
async fn test_second_run_skips_existing_outputs() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let source = temp_dir.path().join("images");
    let output = temp_dir.path().join("out");
    build_source_tree(&source);

    let first = completed(execute(cli_config(&source, &output), &RunOptions::default()).await?);
    let written = std::fs::read(output.join("wide.webp"))?;

    let second = completed(execute(cli_config(&source, &output), &RunOptions::default()).await?);

    assert_eq!(first.processed, 3);
    assert_eq!(second.processed, 0);
    assert_eq!(second.skipped, 3);
    assert_eq!(std::fs::read(output.join("wide.webp"))?, written);

    Ok(())
}

#[tokio::test]
async fn test_existing_destination_is_never_overwritten() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let source = temp_dir.path().join("images");
    let output = temp_dir.path().join("out");
    build_source_tree(&source);

    std::fs::create_dir_all(&output)?;
    std::fs::write(output.join("wide.webp"), b"placeholder")?;

    let summary = completed(execute(cli_config(&source, &output), &RunOptions::default()).await?);

    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.processed, 2);
    assert_eq!(std::fs::read(output.join("wide.webp"))?, b"placeholder");

    Ok(())
}

#[tokio::test]
async fn test_corrupt_file_is_counted_and_batch_continues() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let source = temp_dir.path().join("images");
    let output = temp_dir.path().join("out");
    build_source_tree(&source);
    std::fs::write(source.join("broken.jpg"), b"\xff\xd8 truncated jpeg")?;

    let summary = completed(execute(cli_config(&source, &output), &RunOptions::default()).await?);

    assert_eq!(summary.errors, 1);
    assert_eq!(summary.processed, 3);
    assert!(!output.join("broken.webp").exists());

    let failed: Vec<_> = summary
        .files
        .iter()
        .filter(|f| matches!(f.outcome, FileOutcome::Failed { .. }))
        .collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].source, "broken.jpg");

    Ok(())
}

#[tokio::test]
async fn test_uppercase_extensions_are_accepted() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let source = temp_dir.path().join("images");
    let output = temp_dir.path().join("out");

    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(16, 16, Rgb([1, 2, 3])));
    save(&img, &source.join("SHOUT.PNG"), ImageFormat::Png);
    save(&img, &source.join("photo.Bmp"), ImageFormat::Bmp);

    let summary = completed(execute(cli_config(&source, &output), &RunOptions::default()).await?);

    assert_eq!(summary.processed, 2);
    assert!(output.join("SHOUT.webp").is_file());
    assert!(output.join("photo.webp").is_file());

    Ok(())
}

#[tokio::test]
async fn test_custom_extension_list_and_width() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let source = temp_dir.path().join("images");
    let output = temp_dir.path().join("out");
    build_source_tree(&source);

    let mut config = cli_config(&source, &output);
    config.extensions = vec!["png".to_string()];
    config.max_width = 400;

    let summary = completed(execute(config, &RunOptions::default()).await?);

    assert_eq!(summary.processed, 2);
    assert!(!output.join("nested/small.webp").exists());

    let wide = image::open(output.join("wide.webp"))?;
    assert_eq!((wide.width(), wide.height()), (400, 200));

    Ok(())
}

#[tokio::test]
async fn test_dry_run_writes_nothing() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let source = temp_dir.path().join("images");
    let output = temp_dir.path().join("out");
    build_source_tree(&source);

    let options = RunOptions {
        dry_run: true,
        ..Default::default()
    };
    let outcome = execute(cli_config(&source, &output), &options).await?;

    match outcome {
        RunOutcome::Planned(plan) => {
            assert_eq!(plan.to_convert.len(), 3);
            assert!(plan.already_converted.is_empty());
        }
        RunOutcome::Completed(_) => panic!("dry run must not convert"),
    }
    assert!(!output.exists());

    Ok(())
}

#[tokio::test]
async fn test_report_file_is_written() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let source = temp_dir.path().join("images");
    let output = temp_dir.path().join("out");
    let report_path = temp_dir.path().join("report.json");
    build_source_tree(&source);

    let options = RunOptions {
        report_path: Some(report_path.to_str().unwrap().to_string()),
        ..Default::default()
    };
    execute(cli_config(&source, &output), &options).await?;

    let report: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&report_path)?)?;
    assert_eq!(report["processed"], 3);
    assert_eq!(report["files"].as_array().unwrap().len(), 3);
    assert_eq!(report["settings"]["quality"], 70.0);

    Ok(())
}

#[tokio::test]
async fn test_missing_source_directory_is_fatal() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let source = temp_dir.path().join("does-not-exist");
    let output = temp_dir.path().join("out");

    let result = execute(cli_config(&source, &output), &RunOptions::default()).await;

    match result {
        Err(e @ OptimizeError::SourceNotFound { .. }) => assert_eq!(e.exit_code(), 1),
        other => panic!("expected SourceNotFound, got {:?}", other),
    }
    assert!(!output.exists());

    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn test_non_utf8_file_name_is_converted() -> anyhow::Result<()> {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let temp_dir = TempDir::new()?;
    let source = temp_dir.path().join("images");
    let output = temp_dir.path().join("out");

    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([120, 60, 30])));
    save(
        &img,
        &source.join(OsStr::from_bytes(b"caf\xe9.png")),
        ImageFormat::Png,
    );

    let summary = completed(execute(cli_config(&source, &output), &RunOptions::default()).await?);

    assert_eq!(summary.processed, 1);
    assert_eq!(summary.errors, 0);
    assert_eq!(summary.files[0].source, "caf\u{FFFD}.png");
    assert!(output.join(OsStr::from_bytes(b"caf\xe9.webp")).is_file());

    Ok(())
}

#[tokio::test]
async fn test_colliding_destinations_convert_once() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let source = temp_dir.path().join("images");
    let output = temp_dir.path().join("out");

    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([9, 9, 9])));
    save(&img, &source.join("logo.jpg"), ImageFormat::Jpeg);
    save(&img, &source.join("logo.png"), ImageFormat::Png);

    let summary = completed(execute(cli_config(&source, &output), &RunOptions::default()).await?);

    assert_eq!(summary.processed, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.files[0].source, "logo.jpg");

    Ok(())
}
