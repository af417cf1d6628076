//! Curated sighting log reader
//!
//! The log is a CSV spreadsheet export whose headings vary between survey
//! seasons ("Date", "Time (24h)", "Species code", "No. of individuals", ...).
//! Headings are matched case-insensitively by prefix; all other columns are
//! ignored.

use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use csv::StringRecord;
use regex::Regex;
use thiserror::Error;

use crate::species::Species;

const TIMESTAMP_FORMAT: &str = "%m/%d/%Y %H:%M";

/// Largest plausible number of individuals in one camera frame
pub const MAX_INDIVIDUALS: u32 = 1_000;

/// Heading patterns, tried in order, anchored at the start of the heading
static HEADING_PATTERNS: LazyLock<[(Column, Regex); 4]> = LazyLock::new(|| {
    [
        (Column::Date, Regex::new(r"(?i)^date").unwrap()),
        (Column::Time, Regex::new(r"(?i)^time").unwrap()),
        (Column::Species, Regex::new(r"(?i)^species").unwrap()),
        (Column::Count, Regex::new(r"(?i)^[\w.\s]+individuals").unwrap()),
    ]
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Date,
    Time,
    Species,
    Count,
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Column::Date => "date",
            Column::Time => "time",
            Column::Species => "species",
            Column::Count => "individuals",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum LogError {
    #[error("failed to open sighting log {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("failed to read sighting log")]
    Csv(#[from] csv::Error),
    #[error("sighting log has no {0} column")]
    MissingColumn(Column),
    #[error("line {line}: invalid date/time {value:?}")]
    InvalidTimestamp { line: u64, value: String },
    #[error("line {line}: invalid individual count {value:?}")]
    InvalidCount { line: u64, value: String },
}

/// One retained row of the log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sighting {
    pub timestamp: NaiveDateTime,
    pub species: Species,
    pub count: u32,
}

#[derive(Debug, Clone, Copy)]
struct ColumnIndices {
    date: usize,
    time: usize,
    species: usize,
    count: usize,
}

impl ColumnIndices {
    fn from_headers(headers: &StringRecord) -> Result<Self, LogError> {
        let find = |wanted: Column| {
            headers
                .iter()
                .position(|heading| classify_heading(heading) == Some(wanted))
                .ok_or(LogError::MissingColumn(wanted))
        };

        Ok(Self {
            date: find(Column::Date)?,
            time: find(Column::Time)?,
            species: find(Column::Species)?,
            count: find(Column::Count)?,
        })
    }
}

fn classify_heading(heading: &str) -> Option<Column> {
    HEADING_PATTERNS
        .iter()
        .find(|(_, pattern)| pattern.is_match(heading))
        .map(|(column, _)| *column)
}

#[derive(Debug, Clone, Default)]
pub struct SightingLog {
    sightings: Vec<Sighting>,
    /// Earliest and latest timestamp over every row, retained or not
    range: Option<(NaiveDateTime, NaiveDateTime)>,
    dropped: usize,
}

impl SightingLog {
    pub fn from_path(path: &Path) -> Result<Self, LogError> {
        let reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(|source| LogError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_csv(reader)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LogError> {
        Self::from_csv(csv::ReaderBuilder::new().flexible(true).from_reader(reader))
    }

    fn from_csv<R: Read>(mut reader: csv::Reader<R>) -> Result<Self, LogError> {
        let columns = ColumnIndices::from_headers(reader.headers()?)?;
        let mut log = SightingLog::default();

        for row in reader.records() {
            let row = row?;
            let line = row.position().map_or(0, |p| p.line());
            let field = |index: usize| row.get(index).unwrap_or("").trim();

            let timestamp_text = format!("{} {}", field(columns.date), field(columns.time));
            let timestamp = NaiveDateTime::parse_from_str(&timestamp_text, TIMESTAMP_FORMAT)
                .map_err(|_| LogError::InvalidTimestamp {
                    line,
                    value: timestamp_text.clone(),
                })?;
            log.widen_range(timestamp);

            let count: u32 = match field(columns.count) {
                "" => 1,
                text => text
                    .parse::<u32>()
                    .ok()
                    .filter(|count| *count <= MAX_INDIVIDUALS)
                    .ok_or_else(|| LogError::InvalidCount {
                        line,
                        value: text.to_string(),
                    })?,
            };

            let species = match field(columns.species) {
                "" => None,
                code => match code.parse::<Species>() {
                    Ok(species) => Some(species),
                    Err(err) => {
                        tracing::debug!(line, %err, "dropping row");
                        None
                    }
                },
            };

            match species {
                Some(species) => log.sightings.push(Sighting {
                    timestamp,
                    species,
                    count,
                }),
                None => log.dropped += 1,
            }
        }

        tracing::debug!(
            retained = log.sightings.len(),
            dropped = log.dropped,
            "loaded sighting log"
        );

        Ok(log)
    }

    fn widen_range(&mut self, timestamp: NaiveDateTime) {
        self.range = Some(match self.range {
            Some((first, last)) => (first.min(timestamp), last.max(timestamp)),
            None => (timestamp, timestamp),
        });
    }

    pub fn sightings(&self) -> &[Sighting] {
        &self.sightings
    }

    /// Rows without a recognised species code
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn date_range(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        self.range
    }

    /// Expand every sighting into `count` samples, keyed by species
    pub fn samples(&self) -> BTreeMap<Species, Vec<NaiveDateTime>> {
        self.sightings
            .iter()
            .fold(BTreeMap::new(), |mut samples, sighting| {
                samples
                    .entry(sighting.species)
                    .or_insert_with(Vec::new)
                    .extend(std::iter::repeat(sighting.timestamp).take(sighting.count as usize));
                samples
            })
    }
}
