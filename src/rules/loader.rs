//! CSV-based rule data loader
//!
//! Loads tax bracket tables and eligibility thresholds from data/rules/

use super::{Bracket, BracketTable, EligibilityThresholds, TaxRules};
use crate::error::RuleDataError;
use crate::household::{normalize_jurisdiction, FilingStatus};
use log::{debug, info};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Default path to rule data directory
pub const DEFAULT_RULES_PATH: &str = "data/rules";

/// File holding bracket rows for every jurisdiction and year
pub const TAX_BRACKETS_FILE: &str = "tax_brackets.csv";

/// File holding monthly program thresholds
pub const ELIGIBILITY_THRESHOLDS_FILE: &str = "eligibility_thresholds.csv";

/// Raw CSV row of tax_brackets.csv
#[derive(Debug, serde::Deserialize)]
struct BracketRow {
    tax_year: u16,
    jurisdiction: String,
    filing_status: String,
    upper_bound: String,
    rate: f64,
}

/// Raw CSV row of eligibility_thresholds.csv
#[derive(Debug, serde::Deserialize)]
struct ThresholdRow {
    tax_year: u16,
    program: String,
    monthly_threshold: f64,
}

fn open(path: &Path) -> Result<File, RuleDataError> {
    File::open(path).map_err(|source| RuleDataError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_bound(raw: &str) -> Result<f64, RuleDataError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(f64::INFINITY);
    }
    trimmed.parse().map_err(|_| RuleDataError::InvalidNumber {
        column: "upper_bound",
        value: raw.to_string(),
    })
}

/// Load bracket tables from `tax_brackets.csv` in the given directory
pub fn load_tax_rules(path: &Path, tax_year: Option<u16>) -> Result<TaxRules, RuleDataError> {
    let file = open(&path.join(TAX_BRACKETS_FILE))?;
    load_tax_rules_from_reader(file, tax_year)
}

/// Load bracket tables from any CSV reader
///
/// With `tax_year = None` the latest year present in the data is used.
/// Rows must list each table's brackets in ascending bound order.
pub fn load_tax_rules_from_reader<R: Read>(reader: R, tax_year: Option<u16>) -> Result<TaxRules, RuleDataError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();
    for result in csv_reader.deserialize() {
        let row: BracketRow = result?;
        rows.push(row);
    }

    let year = match tax_year.or_else(|| rows.iter().map(|r| r.tax_year).max()) {
        Some(year) => year,
        None => return Err(RuleDataError::NoTablesForYear(0)),
    };

    // BTreeMap keeps table construction order stable across runs
    let mut grouped: BTreeMap<(String, FilingStatus), Vec<Bracket>> = BTreeMap::new();
    for row in rows.into_iter().filter(|r| r.tax_year == year) {
        let filing_status = FilingStatus::normalize(&row.filing_status)
            .ok_or_else(|| RuleDataError::UnknownFilingStatus(row.filing_status.clone()))?;
        let jurisdiction = normalize_jurisdiction(&row.jurisdiction);

        if !(0.0..=1.0).contains(&row.rate) {
            return Err(RuleDataError::RateOutOfRange {
                jurisdiction,
                filing_status: filing_status.as_str().to_string(),
                rate: row.rate,
            });
        }

        let bound = parse_bound(&row.upper_bound)?;
        grouped
            .entry((jurisdiction, filing_status))
            .or_default()
            .push(Bracket::new(bound, row.rate));
    }

    if grouped.is_empty() {
        return Err(RuleDataError::NoTablesForYear(year));
    }

    let mut rules = TaxRules::new(year);
    for ((jurisdiction, filing_status), brackets) in grouped {
        let table = BracketTable::new(brackets);
        if !table.is_monotonic() {
            return Err(RuleDataError::NonMonotonicBounds {
                jurisdiction,
                filing_status: filing_status.as_str().to_string(),
            });
        }
        debug!(
            "Loaded {} brackets for {}/{} ({})",
            table.len(),
            jurisdiction,
            filing_status.as_str(),
            year
        );
        rules.insert_table(&jurisdiction, filing_status, table);
    }

    info!("Loaded {} bracket tables for tax year {}", rules.table_count(), year);
    Ok(rules)
}

/// Load monthly thresholds from `eligibility_thresholds.csv`
///
/// A missing file is not an error: programs without a threshold evaluate to
/// the informational eligibility state.
pub fn load_eligibility_thresholds(
    path: &Path,
    tax_year: Option<u16>,
) -> Result<EligibilityThresholds, RuleDataError> {
    let file_path = path.join(ELIGIBILITY_THRESHOLDS_FILE);
    if !file_path.exists() {
        debug!("No threshold file at {}; using empty thresholds", file_path.display());
        return Ok(EligibilityThresholds::new());
    }
    let file = open(&file_path)?;
    load_eligibility_thresholds_from_reader(file, tax_year)
}

/// Load monthly thresholds from any CSV reader, keeping rows for `tax_year`
/// (or the latest year per program when no year is given)
pub fn load_eligibility_thresholds_from_reader<R: Read>(
    reader: R,
    tax_year: Option<u16>,
) -> Result<EligibilityThresholds, RuleDataError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut latest: BTreeMap<String, (u16, f64)> = BTreeMap::new();

    for result in csv_reader.deserialize() {
        let row: ThresholdRow = result?;
        if tax_year.is_some_and(|year| year != row.tax_year) {
            continue;
        }
        let program = row.program.trim().to_ascii_uppercase();
        let entry = latest.entry(program).or_insert((row.tax_year, row.monthly_threshold));
        if row.tax_year >= entry.0 {
            *entry = (row.tax_year, row.monthly_threshold);
        }
    }

    let mut thresholds = EligibilityThresholds::new();
    for (program, (_, threshold)) in latest {
        thresholds.insert(&program, threshold);
    }
    Ok(thresholds)
}
