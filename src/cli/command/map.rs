//! Choropleth preparation: fetch the provinces GeoJSON, reconcile names and
//! tabulate the values the map would be coloured with.

use anyhow::Result;
use tabled::Tabled;

use crate::{
    cli::create_spinner,
    dataset::{DatasetCache, ValueColumn},
    geo::{fetch_features, match_names, MatchOutcome},
};

use super::print_table;

#[derive(Tabled)]
struct MapRow {
    #[tabled(rename = "Provincia")]
    province: String,
    #[tabled(rename = "Boundary name")]
    geo_name: String,
    #[tabled(rename = "mm")]
    value: String,
    #[tabled(rename = "Match")]
    matched_via: &'static str,
}

pub async fn map(
    cache: &mut DatasetCache,
    year: u16,
    column: &str,
    geojson_url: &str,
) -> Result<()> {
    let column = ValueColumn::parse(column)?;
    let dataset = cache.load(year)?;

    let spinner = create_spinner("Fetching provinces GeoJSON...".to_string());
    let features = fetch_features(geojson_url).await?;
    spinner.finish_with_message(format!("{} boundary features fetched", features.len()));

    let provinces = dataset.province_names();
    let mapping = match_names(&provinces, &features);

    let mut rows: Vec<(String, String, Option<f64>, &'static str)> = Vec::new();
    for (province, outcome) in &mapping.outcomes {
        let (geo_name, via) = match outcome {
            MatchOutcome::Exact(name) => (name.clone(), "exact"),
            MatchOutcome::Alias(name) => (name.clone(), "alias"),
            MatchOutcome::Fuzzy(name, _) => (name.clone(), "fuzzy"),
            MatchOutcome::Unmatched => continue,
        };
        let record = dataset.records.iter().find(|r| &r.province == province);
        let value = record.and_then(|r| column.value(r));
        rows.push((province.clone(), geo_name, value, via));
    }
    rows.sort_by(|a, b| {
        b.2.partial_cmp(&a.2)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    println!(
        "\nMap values — `{}`, {} ({} of {} provinces matched)\n",
        column.label(),
        year,
        mapping.matched_count(),
        mapping.outcomes.len()
    );
    let table_rows: Vec<MapRow> = rows
        .into_iter()
        .map(|(province, geo_name, value, matched_via)| MapRow {
            province,
            geo_name,
            value: super::format_mm(value),
            matched_via,
        })
        .collect();

    if table_rows.is_empty() {
        println!("No province could be matched; the map would be empty.");
    } else {
        print_table(table_rows);
    }

    if !mapping.unmatched.is_empty() {
        let examples: Vec<&str> = mapping
            .unmatched
            .iter()
            .take(6)
            .map(String::as_str)
            .collect();
        println!(
            "Could not confidently match {} provinces; examples: {}. Provide a boundary \
             file with matching names or extend the alias table.",
            mapping.unmatched.len(),
            examples.join(", ")
        );
    }

    Ok(())
}
