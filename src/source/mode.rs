//! Projection source selection

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Environment variable naming the projection source
pub const PROJECTION_SOURCE_ENV: &str = "PLANNER_PROJECTION_SOURCE";

/// Where projections are computed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionSourceMode {
    /// In-process projection series builder
    #[default]
    Local,
    /// Remote projection service
    Api,
}

impl ProjectionSourceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectionSourceMode::Local => "local",
            ProjectionSourceMode::Api => "api",
        }
    }

    /// Mode configured for this process.
    ///
    /// Read from `PLANNER_PROJECTION_SOURCE` on first use and never re-read.
    pub fn from_env() -> Self {
        static MODE: OnceLock<ProjectionSourceMode> = OnceLock::new();
        *MODE.get_or_init(|| {
            let raw = std::env::var(PROJECTION_SOURCE_ENV).ok();
            let mode = resolve_mode(raw.as_deref());
            debug!("Projection source resolved to '{}'", mode);
            mode
        })
    }
}

impl fmt::Display for ProjectionSourceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalize a raw configuration value; anything unrecognized is `Local`
pub fn resolve_mode(raw: Option<&str>) -> ProjectionSourceMode {
    match raw.map(|value| value.trim().to_ascii_lowercase()).as_deref() {
        Some("api") => ProjectionSourceMode::Api,
        _ => ProjectionSourceMode::Local,
    }
}
