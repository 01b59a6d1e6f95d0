//! Environment-sourced planner configuration

use crate::rules::loader::DEFAULT_RULES_PATH;
use crate::source::{resolve_mode, ProjectionSourceMode, PROJECTION_SOURCE_ENV};
use log::warn;
use std::path::PathBuf;

/// Environment variable naming the rule data directory
pub const RULES_DIR_ENV: &str = "PLANNER_RULES_DIR";

/// Environment variable pinning the tax year
pub const TAX_YEAR_ENV: &str = "PLANNER_TAX_YEAR";

/// Environment variable naming a tenant registry JSON file
pub const TENANTS_FILE_ENV: &str = "PLANNER_TENANTS_FILE";

/// Startup configuration for a planner session
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    /// Where projections are computed
    pub source_mode: ProjectionSourceMode,

    /// Directory holding tax_brackets.csv and eligibility_thresholds.csv
    pub rules_dir: PathBuf,

    /// Tax year to load; `None` loads the latest year in the rule data
    pub tax_year: Option<u16>,

    /// Tenant registry file; `None` uses the built-in registry
    pub tenants_file: Option<PathBuf>,

    /// Resolve state rates from jurisdictions
    pub include_state_tax: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            source_mode: ProjectionSourceMode::Local,
            rules_dir: PathBuf::from(DEFAULT_RULES_PATH),
            tax_year: None,
            tenants_file: None,
            include_state_tax: true,
        }
    }
}

impl PlannerConfig {
    /// Read configuration from the process environment.
    ///
    /// The source mode comes from the process-wide cached resolution, so it
    /// cannot change between sessions of the same process.
    pub fn from_env() -> Self {
        let mut config = Self::from_lookup(|key| std::env::var(key).ok());
        config.source_mode = ProjectionSourceMode::from_env();
        config
    }

    /// Build configuration from any key lookup; unset or unparseable values
    /// keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        config.source_mode = resolve_mode(lookup(PROJECTION_SOURCE_ENV).as_deref());

        if let Some(dir) = lookup(RULES_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            config.rules_dir = PathBuf::from(dir.trim());
        }

        if let Some(raw) = lookup(TAX_YEAR_ENV) {
            match raw.trim().parse::<u16>() {
                Ok(year) => config.tax_year = Some(year),
                Err(_) => warn!("Ignoring {}='{}': not a tax year", TAX_YEAR_ENV, raw),
            }
        }

        if let Some(file) = lookup(TENANTS_FILE_ENV).filter(|v| !v.trim().is_empty()) {
            config.tenants_file = Some(PathBuf::from(file.trim()));
        }

        config
    }
}
