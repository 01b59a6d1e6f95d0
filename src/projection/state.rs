//! Running state carried from one projection month to the next

use super::series::AccountBalance;
use crate::household::PlanInputs;

/// Balances at the end of the most recently computed month
#[derive(Debug, Clone)]
pub struct ProjectionState {
    /// Number of months computed so far
    pub months_elapsed: u32,

    /// Running balance per account, in input order
    pub balances: Vec<f64>,

    /// Monthly growth rate per account, derived once from the annual assumption
    monthly_growth: Vec<f64>,
}

impl ProjectionState {
    /// Initialize state from the household's starting balances
    pub fn from_inputs(inputs: &PlanInputs) -> Self {
        Self {
            months_elapsed: 0,
            balances: inputs.accounts.iter().map(|a| a.balance).collect(),
            monthly_growth: inputs.accounts.iter().map(|a| a.monthly_growth_rate()).collect(),
        }
    }

    /// Balance for account `idx` after applying one month of growth
    pub fn grown_balance(&self, idx: usize) -> f64 {
        self.balances[idx] * (1.0 + self.monthly_growth[idx])
    }

    /// Advance to the next month
    pub fn advance_month(&mut self) {
        self.months_elapsed += 1;
    }

    /// Current balances labeled with their account ids
    pub fn snapshot(&self, inputs: &PlanInputs) -> Vec<AccountBalance> {
        inputs
            .accounts
            .iter()
            .zip(&self.balances)
            .map(|(account, &balance)| AccountBalance {
                account_id: account.id.clone(),
                balance,
            })
            .collect()
    }

    pub fn total_balance(&self) -> f64 {
        self.balances.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::household::{Account, FilingStatus};
    use approx::assert_relative_eq;

    #[test]
    fn test_state_starts_from_input_balances() {
        let mut inputs = PlanInputs::new(FilingStatus::Single, 12);
        inputs.accounts.push(Account::new("ira", 1000.0, 0.12));
        inputs.accounts.push(Account::new("cash", 50.0, 0.0));

        let state = ProjectionState::from_inputs(&inputs);
        assert_eq!(state.months_elapsed, 0);
        assert_eq!(state.total_balance(), 1050.0);
        assert_relative_eq!(state.grown_balance(1), 50.0);
        assert!(state.grown_balance(0) > 1000.0);

        let snapshot = state.snapshot(&inputs);
        assert_eq!(snapshot[0].account_id, "ira");
        assert_eq!(snapshot[1].balance, 50.0);
    }
}
