//! `trailcam analyze`: camera folder to field-log rows

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use event_grouping::{scan_directory, write_report, EventSegmenter, GroupingConfig};

pub fn run(dir: &Path, config: GroupingConfig, out: impl Write) -> Result<()> {
    let scan = scan_directory(dir)?;

    if scan.records.is_empty() {
        tracing::warn!(dir = %dir.display(), "no photos with EXIF timestamps found");
        return Ok(());
    }

    let photos = scan.records.len();
    let events = EventSegmenter::new(config).segment(scan.records)?;
    tracing::info!(
        photos,
        skipped = scan.skipped.len(),
        events = events.len(),
        "grouped photos into events"
    );

    write_report(&events, out).context("Failed to write report")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use event_grouping::SourceError;

    #[test]
    fn test_rejects_non_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("IMG_0001.JPG");
        std::fs::write(&file, b"").unwrap();

        let mut out = Vec::new();
        let err = run(&file, GroupingConfig::default(), &mut out).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<SourceError>(),
            Some(SourceError::NotADirectory(_))
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn test_folder_without_photos_prints_nothing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("README.txt"), "card 2, north fence").unwrap();
        std::fs::create_dir(dir.path().join("thumbs")).unwrap();

        let mut out = Vec::new();
        run(dir.path(), GroupingConfig::default(), &mut out).unwrap();

        assert!(out.is_empty());
    }
}
