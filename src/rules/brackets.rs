//! Marginal-rate bracket tables

use serde::{Deserialize, Serialize};

/// One bracket: income up to and including `upper_bound` is taxed at `rate`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    pub upper_bound: f64,
    pub rate: f64,
}

impl Bracket {
    pub fn new(upper_bound: f64, rate: f64) -> Self {
        Self { upper_bound, rate }
    }
}

/// Ordered bracket table for one (jurisdiction, filing status, tax year)
///
/// Bounds are strictly increasing. Lookup is total: income maps to the first
/// bracket whose bound it does not exceed, or to the top bracket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BracketTable {
    brackets: Vec<Bracket>,
}

impl BracketTable {
    /// Create from brackets already sorted by upper bound
    pub fn new(brackets: Vec<Bracket>) -> Self {
        Self { brackets }
    }

    /// A single rate applied to all income
    pub fn flat(rate: f64) -> Self {
        Self::new(vec![Bracket::new(f64::INFINITY, rate)])
    }

    /// Raw rate of the bracket containing `income`, before any clamping
    pub fn rate_for(&self, income: f64) -> f64 {
        for bracket in &self.brackets {
            if income <= bracket.upper_bound {
                return bracket.rate;
            }
        }
        self.top_rate()
    }

    /// Rate of the highest bracket (0 for an empty table)
    pub fn top_rate(&self) -> f64 {
        self.brackets.last().map(|b| b.rate).unwrap_or(0.0)
    }

    pub fn brackets(&self) -> &[Bracket] {
        &self.brackets
    }

    pub fn len(&self) -> usize {
        self.brackets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brackets.is_empty()
    }

    /// True when bounds strictly increase
    pub fn is_monotonic(&self) -> bool {
        self.brackets
            .windows(2)
            .all(|pair| pair[0].upper_bound < pair[1].upper_bound)
    }
}
