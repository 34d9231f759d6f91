//! KPI and ranking computations over a loaded dataset.
//!
//! Missing values are skipped everywhere; an all-missing column yields
//! `None`, never NaN.

use std::cmp::Ordering;

use crate::dataset::{Dataset, ProvinceRecord, ValueColumn, MONTHS};

#[derive(Debug)]
/// National overview figures.
pub struct NationalSummary {
    pub provinces: usize,
    pub mean_annual: Option<f64>,
    pub total_annual: Option<f64>,
    pub wettest: Option<(String, f64)>,
    pub driest: Option<(String, f64)>,
}

pub fn national_summary(dataset: &Dataset) -> NationalSummary {
    let annuals: Vec<(&str, f64)> = dataset
        .records
        .iter()
        .filter_map(|r| r.annual.map(|v| (r.province.as_str(), v)))
        .collect();

    let wettest = annuals
        .iter()
        .max_by(|a, b| compare(a.1, b.1))
        .map(|(name, v)| (name.to_string(), *v));
    let driest = annuals
        .iter()
        .min_by(|a, b| compare(a.1, b.1))
        .map(|(name, v)| (name.to_string(), *v));
    let total: f64 = annuals.iter().map(|(_, v)| v).sum();

    NationalSummary {
        provinces: dataset.records.len(),
        mean_annual: mean(annuals.iter().map(|(_, v)| *v)),
        total_annual: (!annuals.is_empty()).then_some(total),
        wettest,
        driest,
    }
}

#[derive(Debug)]
/// Figures for a single province.
pub struct ProvinceSummary {
    pub annual: Option<f64>,
    /// Zero-based month index and value of the wettest month.
    pub wettest_month: Option<(usize, f64)>,
    pub driest_month: Option<(usize, f64)>,
    /// Competition rank by annual value (1 = wettest); ties share a rank.
    pub rank: Option<usize>,
}

pub fn province_summary(dataset: &Dataset, record: &ProvinceRecord) -> ProvinceSummary {
    let months: Vec<(usize, f64)> = record
        .monthly
        .iter()
        .enumerate()
        .filter_map(|(idx, v)| v.map(|v| (idx, v)))
        .collect();

    ProvinceSummary {
        annual: record.annual,
        wettest_month: months.iter().max_by(|a, b| compare(a.1, b.1)).copied(),
        driest_month: months.iter().min_by(|a, b| compare(a.1, b.1)).copied(),
        rank: rank_of(dataset, ValueColumn::Annual, &record.province),
    }
}

/// Provinces with a value in the column, sorted descending.
pub fn ranking(dataset: &Dataset, column: ValueColumn) -> Vec<(String, f64)> {
    let mut rows: Vec<(String, f64)> = dataset
        .records
        .iter()
        .filter_map(|r| column.value(r).map(|v| (r.province.clone(), v)))
        .collect();
    rows.sort_by(|a, b| compare(b.1, a.1));
    rows
}

/// Competition rank of a province in a column: one plus the number of
/// provinces with a strictly greater value. `None` if the province has no
/// value in the column.
pub fn rank_of(dataset: &Dataset, column: ValueColumn, province: &str) -> Option<usize> {
    let record = dataset.records.iter().find(|r| r.province == province)?;
    let value = column.value(record)?;
    let greater = dataset
        .records
        .iter()
        .filter_map(|r| column.value(r))
        .filter(|v| *v > value)
        .count();
    Some(greater + 1)
}

/// Mean of each month across provinces (the national monthly series).
pub fn monthly_national_means(dataset: &Dataset) -> [Option<f64>; 12] {
    let mut means = [None; 12];
    for (idx, slot) in means.iter_mut().enumerate() {
        *slot = mean(dataset.records.iter().filter_map(|r| r.monthly[idx]));
    }
    means
}

pub fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values {
        sum += v;
        count += 1;
    }
    (count > 0).then(|| sum / count as f64)
}

fn compare(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Month name for a zero-based index, for display.
pub fn month_name(idx: usize) -> &'static str {
    MONTHS[idx]
}

// -- Tests -------------------------------------------------------------------
