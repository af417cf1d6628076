//! Per-species sighting histograms
//!
//! Two views of the same samples: spread over the survey period, and
//! folded onto a single day to show when each species is active.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Duration, NaiveDateTime, Timelike};

use crate::log::SightingLog;
use crate::species::Species;

const SECS_PER_DAY: f64 = 86_400.0;
const HOURS_PER_DAY: usize = 24;

/// Days of survey period per date bin
const DAYS_PER_DATE_BIN: i64 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SpeciesFilter {
    #[default]
    All,
    Only(BTreeSet<Species>),
    Except(BTreeSet<Species>),
}

impl SpeciesFilter {
    pub fn allows(&self, species: Species) -> bool {
        match self {
            SpeciesFilter::All => true,
            SpeciesFilter::Only(included) => included.contains(&species),
            SpeciesFilter::Except(excluded) => !excluded.contains(&species),
        }
    }
}

/// Equal-width bins over `[lower, upper]`, last bin closed
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    lower: f64,
    upper: f64,
    counts: Vec<u64>,
}

impl Histogram {
    pub fn new(lower: f64, upper: f64, bins: usize) -> Self {
        Self {
            lower,
            upper,
            counts: vec![0; bins.max(1)],
        }
    }

    /// Count a sample. Values outside the range are ignored and return false.
    pub fn add(&mut self, value: f64) -> bool {
        if !(self.lower..=self.upper).contains(&value) {
            return false;
        }
        let last = self.counts.len() - 1;
        let width = self.bin_width();
        let index = if width > 0.0 {
            (((value - self.lower) / width) as usize).min(last)
        } else {
            0
        };
        self.counts[index] += 1;
        true
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    pub fn bin_width(&self) -> f64 {
        (self.upper - self.lower) / self.counts.len() as f64
    }

    pub fn bin_start(&self, index: usize) -> f64 {
        self.lower + self.bin_width() * index as f64
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistogramAxis {
    /// Days since `start`
    Date { start: NaiveDateTime },
    /// Fractional hour of day
    TimeOfDay,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesHistograms {
    pub axis: HistogramAxis,
    /// All histograms share the same bins
    pub histograms: BTreeMap<Species, Histogram>,
}

impl SpeciesHistograms {
    pub fn max_count(&self) -> u64 {
        self.histograms
            .values()
            .flat_map(|h| h.counts().iter().copied())
            .max()
            .unwrap_or(0)
    }

    /// Human-readable start of a bin
    pub fn bin_label(&self, histogram: &Histogram, index: usize) -> String {
        let start = histogram.bin_start(index);
        match self.axis {
            HistogramAxis::Date { start: first } => {
                let offset = Duration::seconds((start * SECS_PER_DAY).round() as i64);
                (first + offset).format("%m/%d/%Y").to_string()
            }
            HistogramAxis::TimeOfDay => {
                let minutes = (start * 60.0).round() as u32;
                format!("{:02}:{:02}", minutes / 60, minutes % 60)
            }
        }
    }
}

fn fractional_hour(timestamp: NaiveDateTime) -> f64 {
    f64::from(timestamp.hour())
        + f64::from(timestamp.minute()) / 60.0
        + f64::from(timestamp.second()) / 3600.0
}

fn build(
    log: &SightingLog,
    filter: &SpeciesFilter,
    template: &Histogram,
    value: impl Fn(NaiveDateTime) -> f64,
) -> BTreeMap<Species, Histogram> {
    log.samples()
        .into_iter()
        .filter(|(species, _)| filter.allows(*species))
        .map(|(species, timestamps)| {
            let histogram = timestamps.into_iter().fold(template.clone(), |mut h, ts| {
                h.add(value(ts));
                h
            });
            (species, histogram)
        })
        .collect()
}

/// Sightings across the whole survey period, one bin per two days.
///
/// The period runs from the first to the last row of the log, including
/// rows dropped for their species. Returns `None` for an empty log.
pub fn date_histograms(log: &SightingLog, filter: &SpeciesFilter) -> Option<SpeciesHistograms> {
    let (first, last) = log.date_range()?;
    let span = last - first;
    let bins = (span.num_days() / DAYS_PER_DATE_BIN).max(1) as usize;
    let template = Histogram::new(0.0, span.num_seconds() as f64 / SECS_PER_DAY, bins);

    let histograms = build(log, filter, &template, |ts| {
        (ts - first).num_seconds() as f64 / SECS_PER_DAY
    });

    Some(SpeciesHistograms {
        axis: HistogramAxis::Date { start: first },
        histograms,
    })
}

/// Sightings by time of day, one bin per hour
pub fn time_of_day_histograms(log: &SightingLog, filter: &SpeciesFilter) -> SpeciesHistograms {
    let template = Histogram::new(0.0, HOURS_PER_DAY as f64, HOURS_PER_DAY);
    SpeciesHistograms {
        axis: HistogramAxis::TimeOfDay,
        histograms: build(log, filter, &template, fractional_hour),
    }
}
