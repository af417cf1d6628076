//! Sighting log aggregation for Trailcam
//!
//! Reads the hand-curated event log (one row per animal visit) and folds it
//! into per-species time distributions, either across the survey period or
//! across the hours of the day.

pub mod histogram;
pub mod log;
pub mod species;

pub use histogram::{
    date_histograms, time_of_day_histograms, Histogram, HistogramAxis, SpeciesFilter,
    SpeciesHistograms,
};
pub use log::{Column, LogError, Sighting, SightingLog, MAX_INDIVIDUALS};
pub use species::{Species, UnknownSpecies};
