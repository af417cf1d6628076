//! Photo records as seen by the event segmenter
//!
//! A record is built once at ingestion time from the file path and the EXIF
//! fields we care about, and never changes afterwards.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Layout of the EXIF `DateTime*` ASCII fields.
pub const EXIF_TIMESTAMP_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// The EXIF timestamp did not match `YYYY:MM:DD HH:MM:SS`.
    #[error("invalid EXIF timestamp {value:?}")]
    InvalidTimestamp { value: String },
}

/// Scene capture type (EXIF tag 0xA406).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptureMode {
    Standard,
    Landscape,
    Portrait,
    NightScene,
    Other(u16),
}

impl CaptureMode {
    pub fn from_exif_value(value: u16) -> Self {
        match value {
            0 => CaptureMode::Standard,
            1 => CaptureMode::Landscape,
            2 => CaptureMode::Portrait,
            3 => CaptureMode::NightScene,
            other => CaptureMode::Other(other),
        }
    }

    /// Night captures on trail cameras are infrared, i.e. black and white.
    pub fn is_monochrome(&self) -> bool {
        matches!(self, CaptureMode::NightScene)
    }
}

/// Parse an EXIF timestamp, tolerating the NUL padding some cameras write.
pub fn parse_exif_timestamp(value: &str) -> Result<NaiveDateTime, RecordError> {
    let trimmed = value.trim_matches(|c: char| c == '\0' || c.is_whitespace());
    NaiveDateTime::parse_from_str(trimmed, EXIF_TIMESTAMP_FORMAT).map_err(|_| {
        RecordError::InvalidTimestamp {
            value: trimmed.to_string(),
        }
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampedRecord {
    timestamp: NaiveDateTime,
    path: PathBuf,
    capture_mode: Option<CaptureMode>,
}

impl TimestampedRecord {
    pub fn new(path: impl Into<PathBuf>, timestamp: NaiveDateTime) -> Self {
        Self {
            timestamp,
            path: path.into(),
            capture_mode: None,
        }
    }

    pub fn with_capture_mode(mut self, capture_mode: Option<CaptureMode>) -> Self {
        self.capture_mode = capture_mode;
        self
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn capture_mode(&self) -> Option<CaptureMode> {
        self.capture_mode
    }

    /// Base name of the source file, used to label event ranges
    pub fn file_name(&self) -> Cow<'_, str> {
        match self.path.file_name() {
            Some(name) => name.to_string_lossy(),
            None => self.path.to_string_lossy(),
        }
    }
}
