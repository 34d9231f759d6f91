mod cli;
mod dataset;
mod geo;
mod stats;

use anyhow::{Error, Result};
use clap::Parser;
use cli::{command, Cli, Commands};
use dataset::DatasetCache;

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    let cli = Cli::parse();
    let mut cache = DatasetCache::new(cli.data_dir.clone());

    let result = match &cli.command {
        Commands::Summary {} => command::summary(&mut cache, cli.year),
        Commands::Province { name, top, rank_by } => {
            command::province(&mut cache, cli.year, name, *top, rank_by)
        }
        Commands::Map {
            column,
            geojson_url,
        } => command::map(&mut cache, cli.year, column, geojson_url).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
