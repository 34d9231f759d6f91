//! Dataset loading and column normalisation.
//!
//! Source files are named `PREC_<year>_Provincias.csv` and come in two
//! conventions: comma-separated or semicolon-separated, UTF-8. Header
//! spellings vary between exports, so the province column is detected
//! against a list of known aliases and the whole layout is resolved once
//! before any row is read.

use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use csv::{ReaderBuilder, StringRecord};
use log::debug;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use super::{Dataset, ProvinceRecord, MONTHS};

/// Accepted header spellings for the province column.
const PROVINCE_ALIASES: [&str; 5] = ["provincia", "region", "prov", "prov_name", "nombre"];

const ANNUAL_HEADER: &str = "anual";

/// Resolved positions of the recognised columns within one file.
#[derive(Debug)]
struct ColumnLayout {
    province: usize,
    months: [Option<usize>; 12],
    annual: Option<usize>,
}

impl ColumnLayout {
    fn resolve(headers: &StringRecord) -> Result<Self> {
        let keys: Vec<String> = headers.iter().map(header_key).collect();

        let province = keys
            .iter()
            .position(|k| PROVINCE_ALIASES.contains(&k.as_str()))
            .with_context(|| {
                format!(
                    "no province column found; expected one of [{}], got [{}]",
                    PROVINCE_ALIASES.join(", "),
                    keys.join(", ")
                )
            })?;

        let mut months = [None; 12];
        for (idx, month) in MONTHS.iter().enumerate() {
            months[idx] = keys.iter().position(|k| k == month);
        }
        let annual = keys.iter().position(|k| k == ANNUAL_HEADER);

        Ok(ColumnLayout {
            province,
            months,
            annual,
        })
    }
}

/// Path of the precipitation file for a year.
pub fn data_file_path(data_dir: &Path, year: u16) -> PathBuf {
    data_dir.join(format!("PREC_{year}_Provincias.csv"))
}

/// Loads and normalises the precipitation file for a year.
///
/// Fatal conditions: missing file, empty file, no recognisable province
/// column, empty or duplicate province names. A numeric cell that fails to
/// parse becomes missing instead of failing the load.
pub fn load_dataset(data_dir: &Path, year: u16) -> Result<Dataset> {
    let path = data_file_path(data_dir, year);
    if !path.exists() {
        bail!(
            "data file not found: `{}`; place the yearly CSV inside `{}`",
            path.display(),
            data_dir.display()
        );
    }

    let raw = fs::read_to_string(&path)
        .with_context(|| format!("could not read `{}`", path.display()))?;
    if raw.trim().is_empty() {
        bail!("data file is empty: `{}`", path.display());
    }

    let delimiter = sniff_delimiter(raw.lines().next().unwrap_or(""));
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(raw.as_bytes());

    let headers = reader.headers()?.clone();
    let layout = ColumnLayout::resolve(&headers)?;
    debug!("resolved column layout for `{}`: {:?}", path.display(), layout);

    let mut records = Vec::new();
    let mut seen = HashSet::new();
    for (row_idx, row) in reader.records().enumerate() {
        let row = row?;
        let province = title_case(row.get(layout.province).unwrap_or(""));
        if province.is_empty() {
            bail!("row {} has an empty province name", row_idx + 1);
        }
        if !seen.insert(province.clone()) {
            bail!("duplicate province `{}` in `{}`", province, path.display());
        }

        let monthly = layout.months.map(|col| col.and_then(|i| parse_value(row.get(i))));
        let annual = layout
            .annual
            .and_then(|i| parse_value(row.get(i)))
            .or_else(|| sum_of_months(&monthly));

        records.push(ProvinceRecord {
            province,
            monthly,
            annual,
        });
    }

    if records.is_empty() {
        bail!("`{}` contains a header but no data rows", path.display());
    }
    debug!("loaded {} provinces from `{}`", records.len(), path.display());

    Ok(Dataset { year, records })
}

/// Folds a header for matching: trim, strip accents, lowercase. Exports
/// disagree on accents ("Región" vs "region") as well as case.
fn header_key(header: &str) -> String {
    header
        .trim()
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

fn sniff_delimiter(header_line: &str) -> u8 {
    if header_line.matches(';').count() > header_line.matches(',').count() {
        b';'
    } else {
        b','
    }
}

/// Title-cases a province name: first letter of each word upper, rest lower.
fn title_case(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(|c| c.to_lowercase()))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Parses a numeric cell, tolerating decimal commas. Anything that does not
/// parse is treated as missing.
fn parse_value(cell: Option<&str>) -> Option<f64> {
    let cell = cell?.trim();
    if cell.is_empty() {
        return None;
    }
    cell.replace(',', ".").parse::<f64>().ok()
}

/// Annual fallback when the source has no usable `anual` cell: the sum of
/// the months, only if all twelve are present.
fn sum_of_months(monthly: &[Option<f64>; 12]) -> Option<f64> {
    monthly.iter().copied().sum::<Option<f64>>()
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {

    use std::io::Write;

    use tempfile::TempDir;

    use super::*;

    fn write_data_file(dir: &Path, year: u16, contents: &str) {
        let mut file = fs::File::create(data_file_path(dir, year)).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
    }

    #[test]
    fn should_load_semicolon_file_with_accented_header() {
        let dir = TempDir::new().unwrap();
        write_data_file(
            dir.path(),
            2021,
            "Región;enero;febrero;anual\nmadrid;10,5;20;300\nsevilla;5;0;150,2\n",
        );

        let ds = load_dataset(dir.path(), 2021).unwrap();

        assert_eq!(ds.records.len(), 2);
        assert_eq!(ds.records[0].province, "Madrid");
        assert_eq!(ds.records[0].monthly[0], Some(10.5));
        assert_eq!(ds.records[0].monthly[1], Some(20.0));
        assert_eq!(ds.records[0].monthly[2], None);
        assert_eq!(ds.records[0].annual, Some(300.0));
        assert_eq!(ds.records[1].province, "Sevilla");
        assert_eq!(ds.records[1].annual, Some(150.2));
    }

    #[test]
    fn should_title_case_multi_word_names() {
        let dir = TempDir::new().unwrap();
        write_data_file(
            dir.path(),
            2021,
            "provincia,anual\nsanta cruz de tenerife,200\nA CORUÑA,900\n",
        );

        let ds = load_dataset(dir.path(), 2021).unwrap();

        assert_eq!(ds.records[0].province, "Santa Cruz De Tenerife");
        assert_eq!(ds.records[1].province, "A Coruña");
    }

    #[test]
    fn should_fail_on_missing_file() {
        let dir = TempDir::new().unwrap();

        let err = load_dataset(dir.path(), 2021).unwrap_err();

        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn should_fail_on_empty_file() {
        let dir = TempDir::new().unwrap();
        write_data_file(dir.path(), 2021, "\n  \n");

        let err = load_dataset(dir.path(), 2021).unwrap_err();

        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn should_fail_without_province_column() {
        let dir = TempDir::new().unwrap();
        write_data_file(dir.path(), 2021, "ciudad,enero,anual\nmadrid,10,300\n");

        let err = load_dataset(dir.path(), 2021).unwrap_err();

        assert!(err.to_string().contains("no province column"));
    }

    #[test]
    fn should_fail_with_zero_data_rows() {
        let dir = TempDir::new().unwrap();
        write_data_file(dir.path(), 2021, "provincia,enero,anual\n");

        let err = load_dataset(dir.path(), 2021).unwrap_err();

        assert!(err.to_string().contains("no data rows"));
    }

    #[test]
    fn should_fail_on_duplicate_province() {
        let dir = TempDir::new().unwrap();
        write_data_file(
            dir.path(),
            2021,
            "provincia,anual\nmadrid,300\nMADRID,301\n",
        );

        let err = load_dataset(dir.path(), 2021).unwrap_err();

        assert!(err.to_string().contains("duplicate province"));
    }

    #[test]
    fn should_treat_unparseable_cell_as_missing() {
        let dir = TempDir::new().unwrap();
        write_data_file(
            dir.path(),
            2021,
            "provincia,enero,febrero,anual\nmadrid,N/D,20,300\nsevilla,5,6,150\n",
        );

        let ds = load_dataset(dir.path(), 2021).unwrap();

        assert_eq!(ds.records[0].monthly[0], None);
        assert_eq!(ds.records[0].monthly[1], Some(20.0));
        assert_eq!(ds.records[1].monthly[0], Some(5.0));
    }

    #[test]
    fn should_recompute_annual_from_complete_months() {
        let dir = TempDir::new().unwrap();
        let months = MONTHS.join(",");
        let values = (1..=12).map(|v| v.to_string()).collect::<Vec<_>>().join(",");
        write_data_file(
            dir.path(),
            2021,
            &format!("provincia,{months},anual\nmadrid,{values},N/D\n"),
        );

        let ds = load_dataset(dir.path(), 2021).unwrap();

        assert_eq!(ds.records[0].annual, Some(78.0));
    }

    #[test]
    fn should_leave_annual_missing_when_months_incomplete() {
        let dir = TempDir::new().unwrap();
        write_data_file(dir.path(), 2021, "provincia,enero,febrero\nmadrid,10,20\n");

        let ds = load_dataset(dir.path(), 2021).unwrap();

        assert_eq!(ds.records[0].annual, None);
    }

    #[test]
    fn should_use_first_alias_column_in_header_order() {
        let dir = TempDir::new().unwrap();
        write_data_file(
            dir.path(),
            2021,
            "nombre,provincia,anual\nzona norte,madrid,300\n",
        );

        let ds = load_dataset(dir.path(), 2021).unwrap();

        assert_eq!(ds.records[0].province, "Zona Norte");
    }
}
