//! Income eligibility classification for means-tested programs (SSI)

use serde::{Deserialize, Serialize};

/// Warning state shown next to an eligibility flag
///
/// At most one flag is set. Both are false only when the household is not
/// flagged as eligible in the first place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityWarningState {
    /// Projected income is strictly above the threshold
    pub exceeds_threshold: bool,
    /// Eligible and not shown to exceed the threshold
    pub eligible_below_threshold: bool,
}

impl EligibilityWarningState {
    pub fn is_warning(&self) -> bool {
        self.exceeds_threshold
    }
}

/// Classify an income figure against a program threshold.
///
/// When the income cannot be trusted (not marked valid, or non-finite) or the
/// threshold is missing, exceeding cannot be proven and the softer
/// informational state is returned instead.
pub fn evaluate_income_eligibility(
    is_eligible: bool,
    income_is_valid: bool,
    income: f64,
    threshold: Option<f64>,
) -> EligibilityWarningState {
    if !is_eligible {
        return EligibilityWarningState::default();
    }

    let comparable = income_is_valid && income.is_finite();
    let exceeds_threshold = match threshold {
        Some(limit) if comparable && limit.is_finite() => income > limit,
        _ => false,
    };

    EligibilityWarningState {
        exceeds_threshold,
        eligible_below_threshold: !exceeds_threshold,
    }
}
