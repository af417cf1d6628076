//! Field-log rows for detected events
//!
//! Each event becomes one tab-separated row matching the columns of the
//! survey's field log. Columns that need a human (observer initials, species,
//! behaviour, ...) are left blank so the rows can be pasted straight into the
//! log spreadsheet and completed there.

use std::io::Write;

use chrono::{Duration, NaiveDateTime};

use crate::segment::WildlifeEvent;

/// Number of columns in every report row
pub const REPORT_COLUMNS: usize = 16;

const DATE_FORMAT: &str = "%m/%d/%Y";
const TIME_FORMAT: &str = "%H:%M";
const MONOCHROME_LABEL: &str = "B&W";
const COLOR_LABEL: &str = "Color";
const RANGE_SEPARATOR: &str = " - ";

/// Events this short are below the log's reporting resolution
const MIN_REPORTED_DURATION_SECS: i64 = 60;

/// Column positions. Anything not listed here is filled in by hand:
/// initials (0, 1), camera id (2), species (6), individuals (7),
/// certainty (8), activity (10), direction (12), good? (13), comments (14).
mod column {
    pub const DATE: usize = 3;
    pub const TIME: usize = 4;
    pub const DURATION: usize = 5;
    pub const PHOTOS: usize = 9;
    pub const COLOR: usize = 11;
    pub const RANGE: usize = 15;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow([String; REPORT_COLUMNS]);

impl ReportRow {
    pub fn fields(&self) -> &[String] {
        &self.0
    }

    pub fn to_tsv_line(&self) -> String {
        self.0.join("\t")
    }
}

/// Integer division rounding to nearest, ties to even
fn div_round_half_even(value: i64, divisor: i64) -> i64 {
    let quotient = value.div_euclid(divisor);
    let remainder = value.rem_euclid(divisor);
    let twice = remainder * 2;
    if twice > divisor || (twice == divisor && quotient % 2 != 0) {
        quotient + 1
    } else {
        quotient
    }
}

/// Snap a timestamp to the nearest whole minute. A timestamp at exactly
/// 30 seconds goes to whichever neighbouring minute is even (counted from
/// the Unix epoch).
fn round_to_minute(timestamp: NaiveDateTime) -> NaiveDateTime {
    let secs = timestamp.and_utc().timestamp();
    let below = Duration::seconds(secs.rem_euclid(60))
        + Duration::nanoseconds(i64::from(timestamp.and_utc().timestamp_subsec_nanos()));
    let floor = timestamp - below;
    if div_round_half_even(secs, 60) > secs.div_euclid(60) {
        floor + Duration::minutes(1)
    } else {
        floor
    }
}

impl WildlifeEvent {
    /// First timestamp, rounded to the nearest minute
    pub fn first_timestamp_rounded(&self) -> NaiveDateTime {
        round_to_minute(self.first_timestamp())
    }

    /// Duration in whole minutes, or `None` for events of a minute or less
    pub fn duration_minutes(&self) -> Option<i64> {
        let secs = self.duration().num_seconds();
        (secs > MIN_REPORTED_DURATION_SECS).then(|| div_round_half_even(secs, 60))
    }

    pub fn report_row(&self) -> ReportRow {
        let mut columns: [String; REPORT_COLUMNS] = Default::default();

        let start = self.first_timestamp_rounded();
        columns[column::DATE] = start.format(DATE_FORMAT).to_string();
        columns[column::TIME] = start.format(TIME_FORMAT).to_string();

        if let Some(minutes) = self.duration_minutes() {
            columns[column::DURATION] = minutes.to_string();
        }

        // Parentheses flag the count as computed, pending review
        columns[column::PHOTOS] = format!("({})", self.count());

        // Decided by the first photo only
        let monochrome = self
            .first()
            .capture_mode()
            .is_some_and(|mode| mode.is_monochrome());
        columns[column::COLOR] = if monochrome { MONOCHROME_LABEL } else { COLOR_LABEL }.to_string();

        columns[column::RANGE] = format!(
            "{}{}{}",
            self.first().file_name(),
            RANGE_SEPARATOR,
            self.last().file_name()
        );

        ReportRow(columns)
    }
}

/// Write one tab-separated line per event, no header
pub fn write_report<W: Write>(events: &[WildlifeEvent], mut out: W) -> std::io::Result<()> {
    for event in events {
        writeln!(out, "{}", event.report_row().to_tsv_line())?;
    }
    out.flush()
}
