//! Benefits Planner - projection and eligibility engine for retirement planning
//!
//! This library provides:
//! - Month-by-month household projections of balances, income and marginal rates
//! - Marginal tax rate resolution from versioned bracket tables
//! - Income eligibility classification (SSI warnings)
//! - A local/remote projection source seam selected once per process
//! - Tenant, language and month-label helpers for the presentation boundary

pub mod config;
pub mod eligibility;
pub mod error;
pub mod household;
pub mod locale;
pub mod projection;
pub mod rules;
pub mod session;
pub mod source;
pub mod tenant;

// Re-export commonly used types
pub use config::PlannerConfig;
pub use eligibility::{evaluate_income_eligibility, EligibilityWarningState};
pub use error::{PlannerError, RuleDataError, TenantError};
pub use household::{Account, BenefitElection, FilingStatus, PlanInputs};
pub use locale::{format_month_index, Language, MonthFormat, MonthStyle};
pub use projection::{ProjectionEngine, ProjectionConfig, ProjectionPoint, ProjectionResult};
pub use rules::{RuleSet, TaxRules};
pub use session::{PlanReport, PlannerSession};
pub use source::{get_projection, resolve_mode, ProjectionSource, ProjectionSourceMode};
pub use tenant::{TenantConfig, TenantRegistry};
