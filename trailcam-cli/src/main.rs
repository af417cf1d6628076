use std::collections::BTreeSet;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use event_grouping::GroupingConfig;
use sighting_log::{Species, SpeciesFilter};
use tracing_subscriber::EnvFilter;

mod analyze;
mod histogram;

use histogram::View;

/// Largest accepted event gap, a century in minutes
const MAX_GAP_MINUTES: i64 = 525_600 * 100;

/// Species charted when no filter is given
const DEFAULT_SPECIES: [Species; 3] = [Species::Cala, Species::Syfl, Species::Lyru];

#[derive(Parser)]
#[command(name = "trailcam")]
#[command(about = "Wildlife camera event grouping and sighting log charts")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Group a folder of camera photos into events and print field-log rows
    Analyze {
        /// Folder containing the photos of one camera card
        path: PathBuf,

        /// Maximum gap between photos of the same event (minutes) [default: 30]
        #[arg(long, value_parser = clap::value_parser!(i64).range(1..=MAX_GAP_MINUTES))]
        gap_minutes: Option<i64>,
    },

    /// Chart a curated sighting log by date or by time of day
    Histogram {
        /// CSV export of the sighting log
        path: PathBuf,

        /// Axis to bin sightings on
        #[arg(long, value_enum, default_value_t = View::TimeOfDay)]
        by: View,

        /// Only chart these species codes (repeatable)
        #[arg(long, value_name = "CODE", conflicts_with_all = ["except", "all"])]
        only: Vec<Species>,

        /// Chart every species except these codes (repeatable)
        #[arg(long, value_name = "CODE", conflicts_with = "all")]
        except: Vec<Species>,

        /// Chart every species in the log
        #[arg(long)]
        all: bool,
    },
}

fn species_filter(only: Vec<Species>, except: Vec<Species>, all: bool) -> SpeciesFilter {
    if all {
        SpeciesFilter::All
    } else if !only.is_empty() {
        SpeciesFilter::Only(only.into_iter().collect())
    } else if !except.is_empty() {
        SpeciesFilter::Except(except.into_iter().collect())
    } else {
        SpeciesFilter::Only(BTreeSet::from(DEFAULT_SPECIES))
    }
}

fn run(cli: Cli) -> Result<()> {
    let stdout = BufWriter::new(io::stdout().lock());

    match cli.command {
        Commands::Analyze { path, gap_minutes } => {
            let config = gap_minutes
                .map(GroupingConfig::from_minutes)
                .unwrap_or_default();
            analyze::run(&path, config, stdout)
        }
        Commands::Histogram {
            path,
            by,
            only,
            except,
            all,
        } => histogram::run(&path, by, &species_filter(only, except, all), stdout),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    // stdout carries the report, logs go to stderr
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::try_parse_from(["trailcam", "analyze", "/cards/cam2", "--gap-minutes", "45"])
            .unwrap();
        match cli.command {
            Commands::Analyze { path, gap_minutes } => {
                assert_eq!(path, PathBuf::from("/cards/cam2"));
                assert_eq!(gap_minutes, Some(45));
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_gap_minutes_bounds() {
        let parse = |minutes: &str| {
            Cli::try_parse_from(["trailcam", "analyze", "/cards/cam2", "--gap-minutes", minutes])
        };

        assert!(parse("0").is_err());
        assert!(parse(&MAX_GAP_MINUTES.to_string()).is_ok());
        assert!(parse(&(MAX_GAP_MINUTES + 1).to_string()).is_err());
        assert!(parse("1000000000000").is_err());
    }

    #[test]
    fn test_parse_histogram_species() {
        let cli = Cli::try_parse_from([
            "trailcam", "histogram", "log.csv", "--by", "date", "--only", "CALA", "--only", "ODHE",
        ])
        .unwrap();
        match cli.command {
            Commands::Histogram {
                by, only, except, all, ..
            } => {
                assert_eq!(by, View::Date);
                assert_eq!(
                    species_filter(only, except, all),
                    SpeciesFilter::Only([Species::Cala, Species::Odhe].into())
                );
            }
            _ => panic!("expected histogram"),
        }

        assert!(Cli::try_parse_from(["trailcam", "histogram", "log.csv", "--only", "BEAR"]).is_err());
        assert!(Cli::try_parse_from([
            "trailcam", "histogram", "log.csv", "--only", "CALA", "--except", "ODHE"
        ])
        .is_err());
    }

    #[test]
    fn test_default_species_filter() {
        assert_eq!(
            species_filter(Vec::new(), Vec::new(), false),
            SpeciesFilter::Only(BTreeSet::from(DEFAULT_SPECIES))
        );
        assert_eq!(species_filter(vec![Species::Cala], Vec::new(), true), SpeciesFilter::All);
        assert_eq!(
            species_filter(Vec::new(), vec![Species::Hosa], false),
            SpeciesFilter::Except([Species::Hosa].into())
        );
    }
}
