//! Projection output structures

use serde::{Deserialize, Serialize};

/// Ending balance of one account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountBalance {
    pub account_id: String,
    pub balance: f64,
}

/// One month of projected state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    /// 0-based month index
    pub month_index: u32,

    /// Post-growth, post-withdrawal balances in input order
    pub balances: Vec<AccountBalance>,

    // Income components for the month
    pub withdrawals: f64,
    pub benefit_income: f64,
    pub other_income: f64,
    pub income: f64,

    /// Income figure the rates were resolved against
    pub annualized_income: f64,

    // Rates
    pub federal_rate: f64,
    pub state_rate: f64,
    pub marginal_rate: f64,
}

impl ProjectionPoint {
    pub fn total_balance(&self) -> f64 {
        self.balances.iter().map(|b| b.balance).sum()
    }

    pub fn balance_of(&self, account_id: &str) -> Option<f64> {
        self.balances
            .iter()
            .find(|b| b.account_id == account_id)
            .map(|b| b.balance)
    }
}

/// Complete projection for one household
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// Tax year of the bracket tables used, if any were loaded
    pub tax_year: Option<u16>,

    /// Monthly points, one per month of the horizon
    pub points: Vec<ProjectionPoint>,

    /// Balances after the last month (starting balances for an empty horizon)
    pub final_balances: Vec<AccountBalance>,
}

impl ProjectionResult {
    pub fn new(tax_year: Option<u16>) -> Self {
        Self {
            tax_year,
            points: Vec::new(),
            final_balances: Vec::new(),
        }
    }

    /// Add a monthly point
    pub fn add_point(&mut self, point: ProjectionPoint) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// True when every monthly income figure is a finite number
    pub fn income_is_finite(&self) -> bool {
        self.points.iter().all(|p| p.income.is_finite())
    }

    /// Highest monthly income over the horizon (0 for an empty series)
    pub fn peak_monthly_income(&self) -> f64 {
        self.points.iter().map(|p| p.income).fold(0.0, f64::max)
    }

    /// Get summary statistics
    pub fn summary(&self) -> ProjectionSummary {
        let total_income: f64 = self.points.iter().map(|p| p.income).sum();
        let total_withdrawals: f64 = self.points.iter().map(|p| p.withdrawals).sum();
        let total_benefits: f64 = self.points.iter().map(|p| p.benefit_income).sum();
        let peak_marginal_rate = self.points.iter().map(|p| p.marginal_rate).fold(0.0, f64::max);
        let final_total_balance: f64 = self.final_balances.iter().map(|b| b.balance).sum();

        ProjectionSummary {
            total_months: self.points.len() as u32,
            total_income,
            total_withdrawals,
            total_benefits,
            peak_monthly_income: self.peak_monthly_income(),
            peak_marginal_rate,
            final_total_balance,
        }
    }
}

/// Summary figures for a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub total_months: u32,
    pub total_income: f64,
    pub total_withdrawals: f64,
    pub total_benefits: f64,
    pub peak_monthly_income: f64,
    pub peak_marginal_rate: f64,
    pub final_total_balance: f64,
}
