//! Detailed figures for one province: KPIs, monthly series against the
//! national mean, and a top-N ranking for a chosen column.

use anyhow::{bail, Result};
use tabled::Tabled;

use crate::{
    dataset::{Dataset, DatasetCache, ProvinceRecord, ValueColumn, MONTHS},
    geo::normalize,
    stats,
};

use super::{format_mm, print_table};

#[derive(Tabled)]
struct MonthRow {
    #[tabled(rename = "Mes")]
    month: &'static str,
    #[tabled(rename = "Provincia (mm)")]
    province: String,
    #[tabled(rename = "Media nacional (mm)")]
    national: String,
}

#[derive(Tabled)]
struct TopRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "Provincia")]
    province: String,
    #[tabled(rename = "mm")]
    value: String,
}

pub fn province(
    cache: &mut DatasetCache,
    year: u16,
    name: &str,
    top: usize,
    rank_by: &str,
) -> Result<()> {
    let rank_column = ValueColumn::parse(rank_by)?;
    let dataset = cache.load(year)?;
    let record = find_province(&dataset, name)?;
    let kpis = stats::province_summary(&dataset, record);

    println!("{} — {year}\n", record.province);
    println!("Annual total:         {} mm", format_mm(kpis.annual));
    match kpis.wettest_month {
        Some((idx, v)) => println!("Wettest month:        {} — {v:.1} mm", MONTHS[idx]),
        None => println!("Wettest month:        -"),
    }
    match kpis.driest_month {
        Some((idx, v)) => println!("Driest month:         {} — {v:.1} mm", MONTHS[idx]),
        None => println!("Driest month:         -"),
    }
    match kpis.rank {
        Some(rank) => println!("Annual rank:          {rank} / {}", dataset.records.len()),
        None => println!("Annual rank:          - (no annual value)"),
    }

    println!("\nMonthly series vs national mean\n");
    let means = stats::monthly_national_means(&dataset);
    let rows: Vec<MonthRow> = MONTHS
        .iter()
        .enumerate()
        .map(|(idx, &month)| MonthRow {
            month,
            province: format_mm(record.monthly[idx]),
            national: format_mm(means[idx]),
        })
        .collect();
    print_table(rows);

    println!("Top {top} by `{}`\n", rank_column.label());
    let ranking = stats::ranking(&dataset, rank_column);
    let rows: Vec<TopRow> = ranking
        .iter()
        .take(top)
        .enumerate()
        .map(|(idx, (province, value))| TopRow {
            position: idx + 1,
            province: province.clone(),
            value: format!("{value:.1}"),
        })
        .collect();
    print_table(rows);

    match stats::rank_of(&dataset, rank_column, &record.province) {
        Some(position) => println!(
            "{} is at position {position} of {} for `{}`.",
            record.province,
            ranking.len(),
            rank_column.label()
        ),
        None => println!(
            "{} has no value for `{}`.",
            record.province,
            rank_column.label()
        ),
    }

    Ok(())
}

/// Finds a province record ignoring case and accents.
fn find_province<'a>(dataset: &'a Dataset, name: &str) -> Result<&'a ProvinceRecord> {
    let key = normalize(name);
    match dataset
        .records
        .iter()
        .find(|r| normalize(&r.province) == key)
    {
        Some(record) => Ok(record),
        None => bail!(
            "province `{}` not found; available: {}",
            name,
            dataset.province_names().join(", ")
        ),
    }
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {

    use super::*;

    fn dataset() -> Dataset {
        Dataset {
            year: 2021,
            records: vec![
                ProvinceRecord {
                    province: "Córdoba".to_string(),
                    monthly: [None; 12],
                    annual: Some(500.0),
                },
                ProvinceRecord {
                    province: "A Coruña".to_string(),
                    monthly: [None; 12],
                    annual: Some(1100.0),
                },
            ],
        }
    }

    #[test]
    fn should_find_province_ignoring_case_and_accents() {
        let ds = dataset();

        assert_eq!(find_province(&ds, "cordoba").unwrap().province, "Córdoba");
        assert_eq!(
            find_province(&ds, "A CORUÑA").unwrap().province,
            "A Coruña"
        );
    }

    #[test]
    fn should_list_available_provinces_when_not_found() {
        let err = find_province(&dataset(), "Zzqqx").unwrap_err();

        assert!(err.to_string().contains("not found"));
        assert!(err.to_string().contains("Córdoba"));
    }
}
