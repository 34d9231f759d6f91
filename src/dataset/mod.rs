//! Provincial precipitation dataset: schema, loading and caching.

pub mod cache;
pub mod load;

use anyhow::{bail, Result};

pub use cache::DatasetCache;
pub use load::load_dataset;

/// Month column headers as they appear in the source files, in calendar order.
pub const MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

#[derive(Debug, Clone)]
/// One province row: twelve monthly totals plus the annual total, in mm.
pub struct ProvinceRecord {
    pub province: String,
    pub monthly: [Option<f64>; 12],
    pub annual: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct Dataset {
    pub year: u16,
    pub records: Vec<ProvinceRecord>,
}

impl Dataset {
    pub fn province_names(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.province.as_str()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// A selectable value column: one of the twelve months, or the annual total.
pub enum ValueColumn {
    Annual,
    /// Zero-based month index into [`MONTHS`].
    Month(usize),
}

impl ValueColumn {
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim().to_lowercase();
        if s == "anual" {
            return Ok(ValueColumn::Annual);
        }
        match MONTHS.iter().position(|m| *m == s) {
            Some(idx) => Ok(ValueColumn::Month(idx)),
            None => bail!(
                "unknown column `{}`; expected `anual` or one of {}",
                s,
                MONTHS.join(", ")
            ),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ValueColumn::Annual => "anual",
            ValueColumn::Month(idx) => MONTHS[*idx],
        }
    }

    /// The record's value in this column.
    pub fn value(&self, record: &ProvinceRecord) -> Option<f64> {
        match self {
            ValueColumn::Annual => record.annual,
            ValueColumn::Month(idx) => record.monthly[*idx],
        }
    }
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn should_parse_value_column() {
        assert_eq!(ValueColumn::parse("anual").unwrap(), ValueColumn::Annual);
        assert_eq!(ValueColumn::parse("enero").unwrap(), ValueColumn::Month(0));
        assert_eq!(
            ValueColumn::parse(" Diciembre ").unwrap(),
            ValueColumn::Month(11)
        );
    }

    #[test]
    fn should_reject_unknown_column() {
        assert!(ValueColumn::parse("january").is_err());
    }

    #[test]
    fn should_select_record_value() {
        let mut monthly = [None; 12];
        monthly[3] = Some(42.5);
        let record = ProvinceRecord {
            province: "Madrid".to_string(),
            monthly,
            annual: Some(400.0),
        };

        assert_eq!(ValueColumn::Annual.value(&record), Some(400.0));
        assert_eq!(ValueColumn::Month(3).value(&record), Some(42.5));
        assert_eq!(ValueColumn::Month(0).value(&record), None);
    }
}
