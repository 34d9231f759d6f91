//! National overview: KPI block, annual ranking, monthly national means.

use anyhow::Result;
use tabled::Tabled;

use crate::{
    dataset::{DatasetCache, ValueColumn},
    stats,
};

use super::{format_mm, print_table};

#[derive(Tabled)]
struct RankingRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Provincia")]
    province: String,
    #[tabled(rename = "anual (mm)")]
    annual: String,
}

#[derive(Tabled)]
struct MonthMeanRow {
    #[tabled(rename = "Mes")]
    month: &'static str,
    #[tabled(rename = "Media nacional (mm)")]
    mean: String,
}

pub fn summary(cache: &mut DatasetCache, year: u16) -> Result<()> {
    let dataset = cache.load(year)?;
    let kpis = stats::national_summary(&dataset);

    println!("National precipitation summary — {year}\n");
    println!("Provinces analysed:   {}", kpis.provinces);
    println!("Mean annual:          {} mm", format_mm(kpis.mean_annual));
    println!("National total:       {} mm", format_mm(kpis.total_annual));
    match &kpis.wettest {
        Some((name, v)) => println!("Wettest province:     {name} — {v:.1} mm"),
        None => println!("Wettest province:     -"),
    }
    match &kpis.driest {
        Some((name, v)) => println!("Driest province:      {name} — {v:.1} mm"),
        None => println!("Driest province:      -"),
    }

    println!("\nAnnual ranking\n");
    print_table(ranking_rows(&stats::ranking(&dataset, ValueColumn::Annual)));

    println!("Monthly national means\n");
    let means = stats::monthly_national_means(&dataset);
    let rows: Vec<MonthMeanRow> = means
        .iter()
        .enumerate()
        .map(|(idx, mean)| MonthMeanRow {
            month: stats::month_name(idx),
            mean: format_mm(*mean),
        })
        .collect();
    print_table(rows);

    Ok(())
}

/// Assigns competition ranks to an already-sorted ranking: ties share the
/// smaller rank.
fn ranking_rows(sorted: &[(String, f64)]) -> Vec<RankingRow> {
    let mut rows = Vec::with_capacity(sorted.len());
    let mut last: Option<(f64, usize)> = None;
    for (idx, (province, value)) in sorted.iter().enumerate() {
        let rank = match last {
            Some((prev, rank)) if prev == *value => rank,
            _ => idx + 1,
        };
        last = Some((*value, rank));
        rows.push(RankingRow {
            rank,
            province: province.clone(),
            annual: format!("{value:.1}"),
        });
    }
    rows
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn should_share_rank_between_tied_rows() {
        let sorted = vec![
            ("Bilbao".to_string(), 1200.0),
            ("Donostia".to_string(), 1200.0),
            ("Madrid".to_string(), 400.0),
        ];

        let rows = ranking_rows(&sorted);

        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[1].rank, 1);
        assert_eq!(rows[2].rank, 3);
    }
}
