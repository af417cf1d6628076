//! `trailcam histogram`: text charts of a curated sighting log

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use sighting_log::{
    date_histograms, time_of_day_histograms, SightingLog, SpeciesFilter, SpeciesHistograms,
};

/// Width of the longest bar in characters
const BAR_WIDTH: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum View {
    /// Across the survey period, two days per bin
    Date,
    /// Across the day, one hour per bin
    TimeOfDay,
}

pub fn run(path: &Path, view: View, filter: &SpeciesFilter, out: impl Write) -> Result<()> {
    let log = SightingLog::from_path(path)?;
    tracing::info!(
        sightings = log.sightings().len(),
        dropped = log.dropped(),
        "loaded sighting log"
    );

    let histograms = match view {
        View::Date => date_histograms(&log, filter),
        View::TimeOfDay => Some(time_of_day_histograms(&log, filter)),
    };

    match histograms {
        Some(histograms) if !histograms.histograms.is_empty() => {
            render(&histograms, out).context("Failed to write chart")?
        }
        _ => tracing::warn!(path = %path.display(), "no sightings to chart"),
    }
    Ok(())
}

fn bar_length(count: u64, max: u64) -> usize {
    if max == 0 {
        return 0;
    }
    // Round up so a single sighting is still visible
    (count * BAR_WIDTH as u64).div_ceil(max) as usize
}

pub fn render(histograms: &SpeciesHistograms, mut out: impl Write) -> std::io::Result<()> {
    let max = histograms.max_count();

    for (species, histogram) in &histograms.histograms {
        writeln!(
            out,
            "{} ({}): {} sightings",
            species.common_name(),
            species.code(),
            histogram.total()
        )?;
        for (index, count) in histogram.counts().iter().enumerate() {
            writeln!(
                out,
                "{:>10} |{:<width$}| {}",
                histograms.bin_label(histogram, index),
                "#".repeat(bar_length(*count, max)),
                count,
                width = BAR_WIDTH
            )?;
        }
        writeln!(out)?;
    }
    out.flush()
}
