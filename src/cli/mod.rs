//! Command line interface.

pub mod command;

use std::{path::PathBuf, time::Duration};

use clap::{command, Parser, Subcommand};
use indicatif::ProgressBar;

use crate::geo::DEFAULT_GEOJSON_URL;

#[derive(Parser)]
#[command(version, about, long_about = None)]
/// Contains the commands
pub struct Cli {
    /// Dataset year; expects `<data-dir>/PREC_<year>_Provincias.csv`
    #[arg(long, global = true, default_value_t = 2021)]
    pub year: u16,

    /// Directory holding the precipitation CSV files
    #[arg(long, global = true, default_value = "data")]
    pub data_dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// National overview: KPIs, annual ranking and monthly means
    Summary {},
    /// Detailed figures for a single province
    Province {
        /// Province name, matched ignoring case and accents
        name: String,
        /// Number of provinces shown in the ranking table
        #[arg(long, default_value_t = 10)]
        top: usize,
        /// Column to rank by: `anual` or a month name (enero..diciembre)
        #[arg(long, default_value = "anual")]
        rank_by: String,
    },
    /// Reconcile provinces against boundary names and tabulate map values
    Map {
        /// Column to colour by: `anual` or a month name (enero..diciembre)
        #[arg(long, default_value = "anual")]
        column: String,
        /// Source of the provinces GeoJSON
        #[arg(long, default_value = DEFAULT_GEOJSON_URL)]
        geojson_url: String,
    },
}

/// Creates a spinner.
pub fn create_spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner().with_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));

    bar
}
