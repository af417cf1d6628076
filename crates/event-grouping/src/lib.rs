//! Event grouping library for Trailcam
//!
//! This crate turns the photos of a motion-triggered wildlife camera into
//! discrete visit events and summarizes each event as a field-log row.

pub mod exif;
pub mod record;
pub mod report;
pub mod segment;

pub use exif::{read_record, scan_directory, ScanResult, SkipReason, SkippedPath, SourceError};
pub use record::{parse_exif_timestamp, CaptureMode, RecordError, TimestampedRecord};
pub use report::{write_report, ReportRow, REPORT_COLUMNS};
pub use segment::{EventSegmenter, GroupingConfig, GroupingError, WildlifeEvent};
