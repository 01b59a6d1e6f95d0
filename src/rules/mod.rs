//! External rule data: tax bracket tables and eligibility thresholds
//!
//! Rule data is loaded once (see [`loader`]) and then shared read-only by
//! every projection. Nothing here hard-codes real brackets; the in-memory
//! [`TaxRules::placeholder`] carries no tables and resolves every rate to 0.

mod brackets;
mod resolver;
pub mod loader;

pub use brackets::{Bracket, BracketTable};
pub use resolver::{clamp_marginal_rate, FEDERAL_JURISDICTION, MAX_MARGINAL_RATE};

use crate::error::RuleDataError;
use crate::household::{normalize_jurisdiction, FilingStatus};
use std::collections::HashMap;
use std::path::Path;

/// Bracket tables in force for one tax year
#[derive(Debug, Clone, Default)]
pub struct TaxRules {
    tax_year: Option<u16>,
    federal: HashMap<FilingStatus, BracketTable>,
    state: HashMap<(String, FilingStatus), BracketTable>,
}

impl TaxRules {
    /// No bracket data at all; every lookup resolves to a zero rate
    pub fn placeholder() -> Self {
        Self::default()
    }

    pub fn new(tax_year: u16) -> Self {
        Self {
            tax_year: Some(tax_year),
            ..Self::default()
        }
    }

    /// Register a table. `US` (any case) registers the federal table.
    pub fn insert_table(&mut self, jurisdiction: &str, filing_status: FilingStatus, table: BracketTable) {
        let code = normalize_jurisdiction(jurisdiction);
        if code == FEDERAL_JURISDICTION {
            self.federal.insert(filing_status, table);
        } else {
            self.state.insert((code, filing_status), table);
        }
    }

    pub fn with_table(mut self, jurisdiction: &str, filing_status: FilingStatus, table: BracketTable) -> Self {
        self.insert_table(jurisdiction, filing_status, table);
        self
    }

    pub fn tax_year(&self) -> Option<u16> {
        self.tax_year
    }

    pub fn federal_table(&self, filing_status: FilingStatus) -> Option<&BracketTable> {
        self.federal.get(&filing_status)
    }

    pub fn state_table(&self, jurisdiction: &str, filing_status: FilingStatus) -> Option<&BracketTable> {
        self.state.get(&(normalize_jurisdiction(jurisdiction), filing_status))
    }

    /// Sorted list of jurisdictions with at least one state table
    pub fn jurisdictions(&self) -> Vec<String> {
        let mut codes: Vec<String> = self.state.keys().map(|(code, _)| code.clone()).collect();
        codes.sort();
        codes.dedup();
        codes
    }

    pub fn table_count(&self) -> usize {
        self.federal.len() + self.state.len()
    }
}

/// Monthly income thresholds for means-tested programs, keyed by program code
#[derive(Debug, Clone, Default)]
pub struct EligibilityThresholds {
    monthly: HashMap<String, f64>,
}

impl EligibilityThresholds {
    /// Program code for Supplemental Security Income
    pub const SSI: &'static str = "SSI";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threshold(mut self, program: &str, monthly_threshold: f64) -> Self {
        self.insert(program, monthly_threshold);
        self
    }

    pub fn insert(&mut self, program: &str, monthly_threshold: f64) {
        self.monthly
            .insert(program.trim().to_ascii_uppercase(), monthly_threshold);
    }

    /// Monthly threshold for a program, if the rule data carries one
    pub fn monthly_threshold(&self, program: &str) -> Option<f64> {
        self.monthly.get(&program.trim().to_ascii_uppercase()).copied()
    }

    pub fn ssi(&self) -> Option<f64> {
        self.monthly_threshold(Self::SSI)
    }
}

/// Container for all rule data used by a planner session
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    pub tax: TaxRules,
    pub thresholds: EligibilityThresholds,
}

impl RuleSet {
    /// Rule set with no tables and no thresholds
    pub fn placeholder() -> Self {
        Self::default()
    }

    /// Load rule data from the default location (data/rules/), latest tax year
    pub fn from_csv() -> Result<Self, RuleDataError> {
        Self::from_csv_path(Path::new(loader::DEFAULT_RULES_PATH), None)
    }

    /// Load rule data from a specific directory, optionally pinning the tax year
    pub fn from_csv_path(path: &Path, tax_year: Option<u16>) -> Result<Self, RuleDataError> {
        let tax = loader::load_tax_rules(path, tax_year)?;
        let year = tax.tax_year().or(tax_year);
        let thresholds = loader::load_eligibility_thresholds(path, year)?;
        Ok(Self { tax, thresholds })
    }
}
