//! Planner session: the effectful shell around the pure engine
//!
//! Reads rule data, tenants and the source mode once, then answers any number
//! of plan requests without touching global state again.
//!
//! # Example
//! ```ignore
//! let session = PlannerSession::new(&PlannerConfig::from_env())?;
//! let report = session.plan(Some("lakeshore"), &inputs).await;
//! if report.ssi.exceeds_threshold { /* show warning */ }
//! ```

use crate::config::PlannerConfig;
use crate::eligibility::{evaluate_income_eligibility, EligibilityWarningState};
use crate::error::PlannerResult;
use crate::household::PlanInputs;
use crate::projection::{ProjectionConfig, ProjectionEngine, ProjectionResult, ProjectionSummary};
use crate::rules::{EligibilityThresholds, RuleSet};
use crate::source::{ProjectionSource, ProjectionSourceMode};
use crate::tenant::{TenantConfig, TenantRegistry};
use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Everything the presentation layer needs for one household
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanReport {
    pub tenant_id: String,
    pub source_mode: ProjectionSourceMode,

    /// Jurisdiction the state rates were resolved for
    pub jurisdiction: Option<String>,

    pub summary: ProjectionSummary,

    /// Monthly threshold the SSI evaluation used, if the rule data has one
    pub ssi_threshold: Option<f64>,
    pub ssi: EligibilityWarningState,

    pub projection: ProjectionResult,
}

/// Pre-loaded planner session
#[derive(Debug, Clone)]
pub struct PlannerSession {
    engine: ProjectionEngine,
    thresholds: EligibilityThresholds,
    tenants: TenantRegistry,
    mode: ProjectionSourceMode,
}

impl PlannerSession {
    /// Load rule data and tenants named by the configuration
    pub fn new(config: &PlannerConfig) -> PlannerResult<Self> {
        let rules = RuleSet::from_csv_path(&config.rules_dir, config.tax_year)?;
        let tenants = match &config.tenants_file {
            Some(path) => TenantRegistry::from_json_path(path)?,
            None => TenantRegistry::builtin(),
        };
        let projection_config = ProjectionConfig {
            include_state_tax: config.include_state_tax,
            ..Default::default()
        };

        info!(
            "Planner session ready: source={}, tax_year={:?}, tenants={}",
            config.source_mode,
            rules.tax.tax_year(),
            tenants.len()
        );
        Ok(Self::with_parts(rules, tenants, config.source_mode, projection_config))
    }

    /// Create a session from already-loaded parts
    pub fn with_parts(
        rules: RuleSet,
        tenants: TenantRegistry,
        mode: ProjectionSourceMode,
        projection_config: ProjectionConfig,
    ) -> Self {
        Self {
            engine: ProjectionEngine::new(rules.tax, projection_config),
            thresholds: rules.thresholds,
            tenants,
            mode,
        }
    }

    pub fn mode(&self) -> ProjectionSourceMode {
        self.mode
    }

    pub fn engine(&self) -> &ProjectionEngine {
        &self.engine
    }

    pub fn tenants(&self) -> &TenantRegistry {
        &self.tenants
    }

    /// Projection and eligibility for one household, through the configured source
    pub async fn plan(&self, raw_tenant: Option<&str>, inputs: &PlanInputs) -> PlanReport {
        let tenant = self.tenants.get_tenant_config(raw_tenant);
        let inputs = apply_tenant_defaults(tenant, inputs);
        let projection = ProjectionSource::new(&self.engine, self.mode)
            .get_projection(&inputs)
            .await;
        self.report(tenant, &inputs, projection, self.mode)
    }

    /// Same as [`plan`](Self::plan) but always computed in-process
    pub fn plan_local(&self, raw_tenant: Option<&str>, inputs: &PlanInputs) -> PlanReport {
        let tenant = self.tenants.get_tenant_config(raw_tenant);
        let inputs = apply_tenant_defaults(tenant, inputs);
        let projection = self.engine.build_projection(&inputs);
        self.report(tenant, &inputs, projection, ProjectionSourceMode::Local)
    }

    /// Plans for many independent households, computed in parallel
    pub fn plan_batch(&self, raw_tenant: Option<&str>, batch: &[PlanInputs]) -> Vec<PlanReport> {
        batch
            .par_iter()
            .map(|inputs| self.plan_local(raw_tenant, inputs))
            .collect()
    }

    fn report(
        &self,
        tenant: &TenantConfig,
        inputs: &PlanInputs,
        projection: ProjectionResult,
        source_mode: ProjectionSourceMode,
    ) -> PlanReport {
        let ssi_threshold = self.thresholds.ssi();
        let income_is_valid = !projection.is_empty() && projection.income_is_finite();
        let ssi = evaluate_income_eligibility(
            inputs.ssi_eligible,
            income_is_valid,
            projection.peak_monthly_income(),
            ssi_threshold,
        );

        PlanReport {
            tenant_id: tenant.id.clone(),
            source_mode,
            jurisdiction: inputs.normalized_jurisdiction(),
            summary: projection.summary(),
            ssi_threshold,
            ssi,
            projection,
        }
    }
}

/// Household inputs with the tenant's state code filled in when the household
/// supplies no jurisdiction of its own
fn apply_tenant_defaults<'a>(tenant: &TenantConfig, inputs: &'a PlanInputs) -> Cow<'a, PlanInputs> {
    match (&tenant.state_code, inputs.normalized_jurisdiction()) {
        (Some(code), None) => {
            let mut owned = inputs.clone();
            owned.jurisdiction = Some(code.clone());
            Cow::Owned(owned)
        }
        _ => Cow::Borrowed(inputs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::household::{Account, BenefitElection, FilingStatus};
    use crate::rules::{BracketTable, TaxRules};
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    fn test_rules() -> RuleSet {
        RuleSet {
            tax: TaxRules::new(2025)
                .with_table("US", FilingStatus::Single, BracketTable::flat(0.12))
                .with_table("IL", FilingStatus::Single, BracketTable::flat(0.0495)),
            thresholds: EligibilityThresholds::new().with_threshold("SSI", 1000.0),
        }
    }

    fn test_tenants() -> TenantRegistry {
        TenantRegistry::from_tenants(vec![TenantConfig {
            id: "lakeshore".to_string(),
            display_name: "Lakeshore".to_string(),
            state_code: Some("IL".to_string()),
            features: BTreeMap::new(),
        }])
    }

    fn test_session(mode: ProjectionSourceMode) -> PlannerSession {
        PlannerSession::with_parts(test_rules(), test_tenants(), mode, ProjectionConfig::default())
    }

    fn household(monthly_benefit: f64) -> PlanInputs {
        let mut inputs = PlanInputs::new(FilingStatus::Single, 24);
        inputs.ssi_eligible = true;
        inputs.accounts.push(Account::new("savings", 2_000.0, 0.0));
        inputs.benefits.push(BenefitElection {
            monthly_benefit,
            start_month: 0,
            annual_cola: 0.0,
        });
        inputs
    }

    #[tokio::test]
    async fn test_income_above_threshold_warns() {
        let session = test_session(ProjectionSourceMode::Local);
        let report = session.plan(None, &household(1_200.0)).await;

        assert_eq!(report.tenant_id, "default");
        assert_eq!(report.ssi_threshold, Some(1000.0));
        assert!(report.ssi.exceeds_threshold);
        assert!(!report.ssi.eligible_below_threshold);
        assert_eq!(report.summary.total_months, 24);
    }

    #[tokio::test]
    async fn test_income_below_threshold_is_informational() {
        let session = test_session(ProjectionSourceMode::Api);
        let report = session.plan(Some("nobody"), &household(800.0)).await;

        assert_eq!(report.source_mode, ProjectionSourceMode::Api);
        assert!(!report.ssi.exceeds_threshold);
        assert!(report.ssi.eligible_below_threshold);
    }

    #[tokio::test]
    async fn test_tenant_state_code_fills_missing_jurisdiction() {
        let session = test_session(ProjectionSourceMode::Local);
        let report = session.plan(Some("LAKESHORE"), &household(1_200.0)).await;

        assert_eq!(report.tenant_id, "lakeshore");
        assert_eq!(report.jurisdiction.as_deref(), Some("IL"));
        assert_eq!(report.projection.points[0].state_rate, 0.0495);
    }

    #[test]
    fn test_household_jurisdiction_wins_over_tenant() {
        let session = test_session(ProjectionSourceMode::Local);
        let mut inputs = household(1_200.0);
        inputs.jurisdiction = Some("zz".to_string());
        let report = session.plan_local(Some("lakeshore"), &inputs);

        assert_eq!(report.jurisdiction.as_deref(), Some("ZZ"));
        assert_eq!(report.projection.points[0].state_rate, 0.0);
    }

    #[test]
    fn test_empty_horizon_cannot_prove_excess() {
        let session = test_session(ProjectionSourceMode::Local);
        let mut inputs = household(5_000.0);
        inputs.horizon_months = 0;
        let report = session.plan_local(None, &inputs);

        assert!(report.projection.is_empty());
        assert!(report.ssi.eligible_below_threshold);
    }

    #[test]
    fn test_not_eligible_has_no_flags() {
        let session = test_session(ProjectionSourceMode::Local);
        let mut inputs = household(5_000.0);
        inputs.ssi_eligible = false;
        let report = session.plan_local(None, &inputs);
        assert_eq!(report.ssi, EligibilityWarningState::default());
    }

    #[test]
    fn test_batch_matches_individual_plans() {
        let session = test_session(ProjectionSourceMode::Local);
        let batch: Vec<PlanInputs> = [400.0, 900.0, 1_500.0].iter().map(|&b| household(b)).collect();

        let reports = session.plan_batch(Some("lakeshore"), &batch);
        assert_eq!(reports.len(), 3);
        for (report, inputs) in reports.iter().zip(&batch) {
            assert_eq!(report, &session.plan_local(Some("lakeshore"), inputs));
        }
        assert!(reports[2].ssi.exceeds_threshold);
    }

    #[test]
    fn test_session_from_shipped_data() {
        let config = PlannerConfig {
            tenants_file: Some(PathBuf::from("data/tenants.json")),
            tax_year: Some(2024),
            ..Default::default()
        };
        let session = PlannerSession::new(&config).expect("Failed to build session");
        assert_eq!(session.mode(), ProjectionSourceMode::Local);
        assert_eq!(session.engine().rules().tax_year(), Some(2024));
        assert!(session.tenants().len() > 1);
    }

    #[test]
    fn test_missing_rules_dir_is_error() {
        let config = PlannerConfig {
            rules_dir: PathBuf::from("data/no_such_dir"),
            ..Default::default()
        };
        assert!(PlannerSession::new(&config).is_err());
    }
}
