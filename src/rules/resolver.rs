//! Marginal tax rate resolution
//!
//! All lookups share one policy: no income (or non-finite income) means no
//! bracket applies, a missing table means a zero rate, and any resolved rate
//! outside [0, MAX_MARGINAL_RATE] is treated as a rule-data defect, logged and
//! clamped.

use super::{BracketTable, TaxRules};
use crate::household::{normalize_jurisdiction, FilingStatus};
use log::warn;

/// Ceiling for any marginal rate this system can produce
pub const MAX_MARGINAL_RATE: f64 = 0.7;

/// Jurisdiction code used for the federal tables
pub const FEDERAL_JURISDICTION: &str = "US";

/// Clamp a resolved rate into [0, MAX_MARGINAL_RATE]; NaN becomes 0
pub fn clamp_marginal_rate(rate: f64) -> f64 {
    if rate.is_nan() {
        warn!("Marginal rate resolved to NaN; rule data is malformed, using 0");
        return 0.0;
    }
    if !(0.0..=MAX_MARGINAL_RATE).contains(&rate) {
        warn!(
            "Marginal rate {} outside [0, {}]; rule data is malformed, clamping",
            rate, MAX_MARGINAL_RATE
        );
        return rate.clamp(0.0, MAX_MARGINAL_RATE);
    }
    rate
}

fn lookup(table: Option<&BracketTable>, income: f64) -> f64 {
    if !income.is_finite() || income <= 0.0 {
        return 0.0;
    }
    match table {
        Some(table) => clamp_marginal_rate(table.rate_for(income)),
        None => 0.0,
    }
}

impl TaxRules {
    /// Marginal rate for a jurisdiction code; `US` selects the federal table
    pub fn resolve_marginal_rate(
        &self,
        filing_status: FilingStatus,
        jurisdiction: &str,
        adjusted_gross_income: f64,
    ) -> f64 {
        let code = normalize_jurisdiction(jurisdiction);
        let table = if code == FEDERAL_JURISDICTION {
            self.federal_table(filing_status)
        } else {
            self.state_table(&code, filing_status)
        };
        lookup(table, adjusted_gross_income)
    }

    /// Federal marginal rate, keyed by filing status only
    pub fn resolve_federal_rate(&self, filing_status: FilingStatus, adjusted_gross_income: f64) -> f64 {
        lookup(self.federal_table(filing_status), adjusted_gross_income)
    }

    /// State marginal rate; no jurisdiction or an unsupported one resolves to 0
    pub fn resolve_state_rate(
        &self,
        filing_status: FilingStatus,
        jurisdiction: Option<&str>,
        adjusted_gross_income: f64,
    ) -> f64 {
        match jurisdiction {
            Some(code) if normalize_jurisdiction(code) != FEDERAL_JURISDICTION => {
                lookup(self.state_table(code, filing_status), adjusted_gross_income)
            }
            _ => 0.0,
        }
    }

    /// Federal plus state rate, under the same ceiling
    pub fn resolve_combined_rate(
        &self,
        filing_status: FilingStatus,
        jurisdiction: Option<&str>,
        adjusted_gross_income: f64,
    ) -> f64 {
        let federal = self.resolve_federal_rate(filing_status, adjusted_gross_income);
        let state = self.resolve_state_rate(filing_status, jurisdiction, adjusted_gross_income);
        clamp_marginal_rate(federal + state)
    }
}
