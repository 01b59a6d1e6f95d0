//! Household input snapshot consumed by the projection engine

use serde::{Deserialize, Serialize};

/// Tax filing status of the household
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilingStatus {
    Single,
    MarriedJoint,
    MarriedSeparate,
    HeadOfHousehold,
}

impl FilingStatus {
    pub const ALL: [FilingStatus; 4] = [
        FilingStatus::Single,
        FilingStatus::MarriedJoint,
        FilingStatus::MarriedSeparate,
        FilingStatus::HeadOfHousehold,
    ];

    /// Parse a filing status code as it appears in rule files and requests.
    /// Returns `None` for anything unrecognized.
    pub fn normalize(raw: &str) -> Option<Self> {
        let folded = raw.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match folded.as_str() {
            "single" | "s" => Some(FilingStatus::Single),
            "married_joint" | "married_filing_jointly" | "mfj" => Some(FilingStatus::MarriedJoint),
            "married_separate" | "married_filing_separately" | "mfs" => {
                Some(FilingStatus::MarriedSeparate)
            }
            "head_of_household" | "hoh" => Some(FilingStatus::HeadOfHousehold),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FilingStatus::Single => "single",
            FilingStatus::MarriedJoint => "married_joint",
            FilingStatus::MarriedSeparate => "married_separate",
            FilingStatus::HeadOfHousehold => "head_of_household",
        }
    }
}

/// A single savings or retirement account held by the household
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Caller-supplied identifier, echoed back in projection points
    pub id: String,

    /// Current balance
    pub balance: f64,

    /// Annual growth assumption (0.05 = 5%/yr), compounded monthly
    #[serde(default)]
    pub annual_growth_rate: f64,

    /// Planned monthly draw once withdrawals start
    #[serde(default)]
    pub monthly_withdrawal: f64,

    /// First month index (0-based) in which withdrawals are taken
    #[serde(default)]
    pub withdrawal_start_month: u32,
}

impl Account {
    pub fn new(id: impl Into<String>, balance: f64, annual_growth_rate: f64) -> Self {
        Self {
            id: id.into(),
            balance,
            annual_growth_rate,
            monthly_withdrawal: 0.0,
            withdrawal_start_month: 0,
        }
    }

    /// Builder-style withdrawal plan
    pub fn with_withdrawal(mut self, monthly_withdrawal: f64, start_month: u32) -> Self {
        self.monthly_withdrawal = monthly_withdrawal;
        self.withdrawal_start_month = start_month;
        self
    }

    /// Monthly growth factor minus one, equivalent to the annual assumption
    pub fn monthly_growth_rate(&self) -> f64 {
        (1.0 + self.annual_growth_rate).powf(1.0 / 12.0) - 1.0
    }
}

/// A benefit stream the household has elected (Social Security, pension, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenefitElection {
    /// Monthly payment at the start month
    pub monthly_benefit: f64,

    /// First month index (0-based) in which the benefit is paid
    #[serde(default)]
    pub start_month: u32,

    /// Annual cost-of-living adjustment, applied every 12 months after start
    #[serde(default)]
    pub annual_cola: f64,
}

impl BenefitElection {
    /// Payment for a given projection month; zero before the start month
    pub fn payment_for_month(&self, month_index: u32) -> f64 {
        if month_index < self.start_month {
            return 0.0;
        }
        let years_paid = (month_index - self.start_month) / 12;
        self.monthly_benefit * (1.0 + self.annual_cola).powi(years_paid as i32)
    }
}

/// Immutable snapshot of everything a projection needs about one household
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanInputs {
    pub filing_status: FilingStatus,

    /// State/jurisdiction code (e.g. "CA"); `None` means federal only
    #[serde(default)]
    pub jurisdiction: Option<String>,

    pub accounts: Vec<Account>,

    #[serde(default)]
    pub benefits: Vec<BenefitElection>,

    /// Wages, pensions and other income not modeled as an account or benefit
    #[serde(default)]
    pub other_monthly_income: f64,

    /// Whether the household is flagged as SSI eligible
    #[serde(default)]
    pub ssi_eligible: bool,

    /// Number of months to project
    pub horizon_months: u32,
}

impl PlanInputs {
    pub fn new(filing_status: FilingStatus, horizon_months: u32) -> Self {
        Self {
            filing_status,
            jurisdiction: None,
            accounts: Vec::new(),
            benefits: Vec::new(),
            other_monthly_income: 0.0,
            ssi_eligible: false,
            horizon_months,
        }
    }

    /// Jurisdiction code trimmed and upper-cased; blank codes count as absent
    pub fn normalized_jurisdiction(&self) -> Option<String> {
        self.jurisdiction
            .as_deref()
            .map(normalize_jurisdiction)
            .filter(|code| !code.is_empty())
    }

    /// Sum of starting balances across all accounts
    pub fn total_starting_balance(&self) -> f64 {
        self.accounts.iter().map(|a| a.balance).sum()
    }
}

/// Canonical form of a jurisdiction code used for rule lookups
pub fn normalize_jurisdiction(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_filing_status_aliases() {
        assert_eq!(FilingStatus::normalize(" MFJ "), Some(FilingStatus::MarriedJoint));
        assert_eq!(FilingStatus::normalize("head-of-household"), Some(FilingStatus::HeadOfHousehold));
        assert_eq!(FilingStatus::normalize("married_separate"), Some(FilingStatus::MarriedSeparate));
        assert_eq!(FilingStatus::normalize("Single"), Some(FilingStatus::Single));
        assert_eq!(FilingStatus::normalize("widowed"), None);
    }

    #[test]
    fn test_filing_status_round_trips_through_as_str() {
        for status in FilingStatus::ALL {
            assert_eq!(FilingStatus::normalize(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_monthly_growth_compounds_to_annual() {
        let account = Account::new("ira", 1000.0, 0.06);
        let monthly = account.monthly_growth_rate();
        assert_relative_eq!((1.0 + monthly).powi(12), 1.06, epsilon = 1e-12);
    }

    #[test]
    fn test_benefit_cola_steps_each_year() {
        let benefit = BenefitElection {
            monthly_benefit: 1000.0,
            start_month: 6,
            annual_cola: 0.02,
        };
        assert_eq!(benefit.payment_for_month(5), 0.0);
        assert_relative_eq!(benefit.payment_for_month(6), 1000.0);
        assert_relative_eq!(benefit.payment_for_month(17), 1000.0);
        assert_relative_eq!(benefit.payment_for_month(18), 1020.0, epsilon = 1e-9);
    }

    #[test]
    fn test_blank_jurisdiction_is_absent() {
        let mut inputs = PlanInputs::new(FilingStatus::Single, 12);
        inputs.jurisdiction = Some("   ".to_string());
        assert_eq!(inputs.normalized_jurisdiction(), None);

        inputs.jurisdiction = Some(" ca ".to_string());
        assert_eq!(inputs.normalized_jurisdiction().as_deref(), Some("CA"));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{
            "filing_status": "married_joint",
            "accounts": [{"id": "401k", "balance": 250000.0}],
            "horizon_months": 24
        }"#;
        let inputs: PlanInputs = serde_json::from_str(json).unwrap();
        assert_eq!(inputs.filing_status, FilingStatus::MarriedJoint);
        assert!(inputs.benefits.is_empty());
        assert!(!inputs.ssi_eligible);
        assert_eq!(inputs.accounts[0].annual_growth_rate, 0.0);
        assert_eq!(inputs.accounts[0].withdrawal_start_month, 0);
    }
}
