//! Core projection engine for monthly balance and income projections

use super::series::{ProjectionPoint, ProjectionResult};
use super::state::ProjectionState;
use crate::household::{Account, PlanInputs};
use crate::rules::{clamp_marginal_rate, TaxRules};

/// Configuration for a projection run
#[derive(Debug, Clone)]
pub struct ProjectionConfig {
    /// Resolve state rates from the household's jurisdiction
    pub include_state_tax: bool,

    /// Resolve rates against monthly income * 12 (bracket tables are annual)
    pub annualize_income: bool,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            include_state_tax: true,
            annualize_income: true,
        }
    }
}

/// Main projection engine
///
/// Holds read-only rule data; `build_projection` is a pure function of the
/// inputs it is given, so one engine can serve many threads at once.
#[derive(Debug, Clone, Default)]
pub struct ProjectionEngine {
    rules: TaxRules,
    config: ProjectionConfig,
}

impl ProjectionEngine {
    /// Create a new projection engine with given rules and config
    pub fn new(rules: TaxRules, config: ProjectionConfig) -> Self {
        Self { rules, config }
    }

    pub fn rules(&self) -> &TaxRules {
        &self.rules
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Build the month-by-month projection for one household
    pub fn build_projection(&self, inputs: &PlanInputs) -> ProjectionResult {
        let jurisdiction = if self.config.include_state_tax {
            inputs.normalized_jurisdiction()
        } else {
            None
        };

        let mut result = ProjectionResult::new(self.rules.tax_year());
        result.points.reserve(inputs.horizon_months as usize);
        let mut state = ProjectionState::from_inputs(inputs);

        for month_index in 0..inputs.horizon_months {
            let point = self.calculate_month(inputs, jurisdiction.as_deref(), &mut state, month_index);
            result.add_point(point);
            state.advance_month();
        }

        result.final_balances = state.snapshot(inputs);
        result
    }

    /// Calculate one month from the prior month's ending balances
    fn calculate_month(
        &self,
        inputs: &PlanInputs,
        jurisdiction: Option<&str>,
        state: &mut ProjectionState,
        month_index: u32,
    ) -> ProjectionPoint {
        let mut withdrawals = 0.0;
        for (idx, account) in inputs.accounts.iter().enumerate() {
            let grown = state.grown_balance(idx);
            let withdrawal = planned_withdrawal(account, month_index, grown);
            state.balances[idx] = grown - withdrawal;
            withdrawals += withdrawal;
        }

        let benefit_income: f64 = inputs
            .benefits
            .iter()
            .map(|b| b.payment_for_month(month_index))
            .sum();
        let other_income = inputs.other_monthly_income;
        let income = withdrawals + benefit_income + other_income;

        let annualized_income = if self.config.annualize_income {
            income * 12.0
        } else {
            income
        };

        let federal_rate = self
            .rules
            .resolve_federal_rate(inputs.filing_status, annualized_income);
        let state_rate = self
            .rules
            .resolve_state_rate(inputs.filing_status, jurisdiction, annualized_income);

        ProjectionPoint {
            month_index,
            balances: state.snapshot(inputs),
            withdrawals,
            benefit_income,
            other_income,
            income,
            annualized_income,
            federal_rate,
            state_rate,
            marginal_rate: clamp_marginal_rate(federal_rate + state_rate),
        }
    }
}

/// Amount drawn from an account this month
///
/// Nothing is drawn before the start month or from an exhausted (or
/// non-numeric) balance; otherwise the draw is capped at what is available.
fn planned_withdrawal(account: &Account, month_index: u32, grown_balance: f64) -> f64 {
    if month_index < account.withdrawal_start_month || !(grown_balance > 0.0) {
        return 0.0;
    }
    account.monthly_withdrawal.min(grown_balance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::household::{BenefitElection, FilingStatus};
    use crate::rules::{Bracket, BracketTable};
    use approx::assert_relative_eq;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    fn test_inputs(horizon_months: u32) -> PlanInputs {
        let mut inputs = PlanInputs::new(FilingStatus::Single, horizon_months);
        inputs.jurisdiction = Some("ZZ".to_string());
        inputs.accounts.push(Account::new("ira", 120_000.0, 0.05).with_withdrawal(2_000.0, 3));
        inputs.accounts.push(Account::new("cash", 10_000.0, 0.0));
        inputs.benefits.push(BenefitElection {
            monthly_benefit: 1_500.0,
            start_month: 6,
            annual_cola: 0.025,
        });
        inputs
    }

    fn test_rules() -> TaxRules {
        TaxRules::new(2024)
            .with_table(
                "US",
                FilingStatus::Single,
                BracketTable::new(vec![
                    Bracket::new(11_600.0, 0.10),
                    Bracket::new(47_150.0, 0.12),
                    Bracket::new(f64::INFINITY, 0.22),
                ]),
            )
            .with_table("IL", FilingStatus::Single, BracketTable::flat(0.0495))
    }

    #[test]
    fn test_projection_runs() {
        let engine = ProjectionEngine::new(test_rules(), ProjectionConfig::default());
        let result = engine.build_projection(&test_inputs(24));

        assert_eq!(result.len(), 24);
        assert_eq!(result.tax_year, Some(2024));
        for (idx, point) in result.points.iter().enumerate() {
            assert_eq!(point.month_index, idx as u32);
            assert_eq!(point.balances.len(), 2);
        }
    }

    #[test]
    fn test_zero_horizon_is_empty() {
        let engine = ProjectionEngine::default();
        let result = engine.build_projection(&test_inputs(0));

        assert!(result.is_empty());
        assert_eq!(result.final_balances[0].balance, 120_000.0);
        assert_eq!(result.summary().total_months, 0);
    }

    #[test]
    fn test_growth_compounds_monthly() {
        let mut inputs = PlanInputs::new(FilingStatus::Single, 12);
        inputs.accounts.push(Account::new("ira", 1_000.0, 0.06));
        let result = ProjectionEngine::default().build_projection(&inputs);

        assert_relative_eq!(result.final_balances[0].balance, 1_060.0, epsilon = 1e-9);
        assert_relative_eq!(result.points[11].total_balance(), 1_060.0, epsilon = 1e-9);
    }

    #[test]
    fn test_withdrawals_start_on_schedule() {
        let result = ProjectionEngine::default().build_projection(&test_inputs(12));

        assert_eq!(result.points[2].withdrawals, 0.0);
        assert_eq!(result.points[3].withdrawals, 2_000.0);
        assert_eq!(result.points[5].benefit_income, 0.0);
        assert_eq!(result.points[6].benefit_income, 1_500.0);
        assert_eq!(result.points[6].income, 3_500.0);
    }

    #[test]
    fn test_withdrawal_capped_at_balance() {
        let mut inputs = PlanInputs::new(FilingStatus::Single, 3);
        inputs.accounts.push(Account::new("cash", 250.0, 0.0).with_withdrawal(200.0, 0));
        let result = ProjectionEngine::default().build_projection(&inputs);

        assert_eq!(result.points[0].withdrawals, 200.0);
        assert_eq!(result.points[1].withdrawals, 50.0);
        assert_eq!(result.points[2].withdrawals, 0.0);
        assert_eq!(result.final_balances[0].balance, 0.0);
    }

    #[test]
    fn test_negative_balance_propagates() {
        let mut inputs = PlanInputs::new(FilingStatus::Single, 2);
        inputs.accounts.push(Account::new("loan", -500.0, 0.0).with_withdrawal(100.0, 0));
        let result = ProjectionEngine::default().build_projection(&inputs);

        assert_eq!(result.points[1].balance_of("loan"), Some(-500.0));
        assert_eq!(result.points[1].withdrawals, 0.0);
    }

    #[test]
    fn test_nan_propagates_without_panicking() {
        let mut inputs = PlanInputs::new(FilingStatus::Single, 4);
        inputs.accounts.push(Account::new("bad", f64::NAN, 0.05).with_withdrawal(100.0, 0));
        inputs.other_monthly_income = f64::NAN;
        let result = ProjectionEngine::new(test_rules(), ProjectionConfig::default()).build_projection(&inputs);

        assert_eq!(result.len(), 4);
        assert!(result.final_balances[0].balance.is_nan());
        assert!(!result.income_is_finite());
        assert_eq!(result.points[0].marginal_rate, 0.0);
    }

    #[test]
    fn test_rates_follow_annualized_income() {
        let mut inputs = PlanInputs::new(FilingStatus::Single, 1);
        inputs.jurisdiction = Some("il".to_string());
        inputs.other_monthly_income = 2_000.0;
        let engine = ProjectionEngine::new(test_rules(), ProjectionConfig::default());
        let point = &engine.build_projection(&inputs).points[0];

        assert_eq!(point.annualized_income, 24_000.0);
        assert_eq!(point.federal_rate, 0.12);
        assert_eq!(point.state_rate, 0.0495);
        assert_relative_eq!(point.marginal_rate, 0.1695, epsilon = 1e-12);
    }

    #[test]
    fn test_federal_only_config_skips_state() {
        let mut inputs = PlanInputs::new(FilingStatus::Single, 1);
        inputs.jurisdiction = Some("IL".to_string());
        inputs.other_monthly_income = 2_000.0;
        let config = ProjectionConfig {
            include_state_tax: false,
            ..Default::default()
        };
        let point = &ProjectionEngine::new(test_rules(), config).build_projection(&inputs).points[0];
        assert_eq!(point.state_rate, 0.0);
        assert_eq!(point.marginal_rate, 0.12);
    }

    #[test]
    fn test_placeholder_rules_give_zero_rates() {
        let result = ProjectionEngine::default().build_projection(&test_inputs(12));
        assert!(result.points.iter().all(|p| p.marginal_rate == 0.0));
    }

    #[test]
    fn test_projection_is_deterministic() {
        let engine = ProjectionEngine::new(test_rules(), ProjectionConfig::default());
        let inputs = test_inputs(120);
        let first = serde_json::to_string(&engine.build_projection(&inputs)).unwrap();
        let second = serde_json::to_string(&engine.build_projection(&inputs)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let inputs = test_inputs(36);
        let before = inputs.clone();
        ProjectionEngine::default().build_projection(&inputs);
        assert_eq!(inputs, before);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(32))]

        #[test]
        fn prop_length_matches_horizon(horizon in 0u32..600) {
            let result = ProjectionEngine::default().build_projection(&test_inputs(horizon));
            prop_assert_eq!(result.len(), horizon as usize);
        }

        #[test]
        fn prop_earlier_months_ignore_later_horizon(short in 0u32..120, extra in 1u32..120) {
            let engine = ProjectionEngine::new(test_rules(), ProjectionConfig::default());
            let short_run = engine.build_projection(&test_inputs(short));
            let long_run = engine.build_projection(&test_inputs(short + extra));
            prop_assert!(long_run.points.starts_with(&short_run.points));
        }
    }
}
