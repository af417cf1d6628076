//! EXIF timestamp source for Trailcam
//!
//! Reads capture timestamps and scene capture types from the images in a
//! camera folder using rexif. Files that cannot contribute a timestamp are
//! skipped with a warning instead of failing the whole scan.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use rexif::{ExifEntry, ExifTag, TagValue};
use thiserror::Error;

use crate::record::{parse_exif_timestamp, CaptureMode, RecordError, TimestampedRecord};

/// Timestamp tags in order of preference.
const TIMESTAMP_TAGS: [ExifTag; 3] = [
    ExifTag::DateTime,
    ExifTag::DateTimeOriginal,
    ExifTag::DateTimeDigitized,
];

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("target path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("failed to list directory {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why a candidate path did not produce a record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SkipReason {
    #[error("not a regular file")]
    NotAFile,
    #[error("failed to read file ({0})")]
    Unreadable(String),
    #[error("file is missing EXIF ({0})")]
    NoExif(String),
    #[error("EXIF has no capture timestamp")]
    MissingTimestamp,
    #[error(transparent)]
    InvalidTimestamp(#[from] RecordError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPath {
    pub path: PathBuf,
    pub reason: SkipReason,
}

#[derive(Debug, Default)]
pub struct ScanResult {
    /// Valid records, in no particular order
    pub records: Vec<TimestampedRecord>,
    pub skipped: Vec<SkippedPath>,
}

/// Read a single image into a record
pub fn read_record(path: &Path) -> Result<TimestampedRecord, SkipReason> {
    if !path.is_file() {
        return Err(SkipReason::NotAFile);
    }

    let contents = std::fs::read(path).map_err(|e| SkipReason::Unreadable(e.to_string()))?;
    let exif = rexif::parse_buffer(&contents).map_err(|e| SkipReason::NoExif(e.to_string()))?;

    let timestamp = TIMESTAMP_TAGS
        .iter()
        .find_map(|tag| ascii_value(&exif.entries, *tag));
    let scene_capture_type = u16_value(&exif.entries, ExifTag::SceneCaptureType);

    build_record(path, timestamp, scene_capture_type)
}

fn build_record(
    path: &Path,
    timestamp: Option<&str>,
    scene_capture_type: Option<u16>,
) -> Result<TimestampedRecord, SkipReason> {
    let timestamp = timestamp.ok_or(SkipReason::MissingTimestamp)?;
    let timestamp = parse_exif_timestamp(timestamp)?;

    Ok(TimestampedRecord::new(path, timestamp)
        .with_capture_mode(scene_capture_type.map(CaptureMode::from_exif_value)))
}

fn ascii_value(entries: &[ExifEntry], tag: ExifTag) -> Option<&str> {
    entries
        .iter()
        .find(|entry| entry.tag == tag)
        .and_then(|entry| match &entry.value {
            TagValue::Ascii(text) => Some(text.as_str()),
            _ => None,
        })
}

fn u16_value(entries: &[ExifEntry], tag: ExifTag) -> Option<u16> {
    entries
        .iter()
        .find(|entry| entry.tag == tag)
        .and_then(|entry| match &entry.value {
            TagValue::U16(values) => values.first().copied(),
            _ => None,
        })
}

/// Scan a camera folder (non-recursively) and read every entry in parallel
pub fn scan_directory(dir: &Path) -> Result<ScanResult, SourceError> {
    if !dir.is_dir() {
        return Err(SourceError::NotADirectory(dir.to_path_buf()));
    }

    let io_error = |source: std::io::Error| SourceError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths = std::fs::read_dir(dir)
        .map_err(io_error)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(io_error)?;
    paths.sort();

    tracing::debug!(dir = %dir.display(), candidates = paths.len(), "reading EXIF");

    let outcomes: Vec<(PathBuf, Result<TimestampedRecord, SkipReason>)> = paths
        .into_par_iter()
        .map(|path| {
            let outcome = read_record(&path);
            (path, outcome)
        })
        .collect();

    let mut result = ScanResult::default();
    for (path, outcome) in outcomes {
        match outcome {
            Ok(record) => result.records.push(record),
            Err(reason) => {
                tracing::warn!(path = %path.display(), %reason, "skipping path");
                result.skipped.push(SkippedPath { path, reason });
            }
        }
    }

    Ok(result)
}
