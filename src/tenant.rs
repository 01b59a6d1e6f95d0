//! Per-tenant configuration lookup
//!
//! The engine only reads rule-selection parameters (the state code) from a
//! tenant; branding and feature flags are carried for the presentation layer.
//! Unknown or absent tenant ids always resolve to the default tenant.

use crate::error::TenantError;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Id of the tenant every unknown id resolves to
pub const DEFAULT_TENANT_ID: &str = "default";

/// Configuration for one tenant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantConfig {
    pub id: String,

    #[serde(default)]
    pub display_name: String,

    /// Jurisdiction applied when a household does not supply one
    #[serde(default)]
    pub state_code: Option<String>,

    #[serde(default)]
    pub features: BTreeMap<String, bool>,
}

impl TenantConfig {
    pub fn default_tenant() -> Self {
        Self {
            id: DEFAULT_TENANT_ID.to_string(),
            display_name: "Benefits Planner".to_string(),
            state_code: None,
            features: BTreeMap::new(),
        }
    }

    pub fn feature_enabled(&self, feature: &str) -> bool {
        self.features.get(feature).copied().unwrap_or(false)
    }
}

/// Read-only set of known tenants
#[derive(Debug, Clone)]
pub struct TenantRegistry {
    tenants: BTreeMap<String, TenantConfig>,
}

impl Default for TenantRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TenantRegistry {
    /// Registry holding only the default tenant
    pub fn builtin() -> Self {
        Self::from_tenants(Vec::new())
    }

    /// Build from a list of tenants; ids are normalized and a default tenant is
    /// added when the list lacks one
    pub fn from_tenants(tenants: Vec<TenantConfig>) -> Self {
        let mut map = BTreeMap::new();
        for mut tenant in tenants {
            let id = fold_id(&tenant.id);
            if id.is_empty() {
                continue;
            }
            tenant.id = id.clone();
            map.insert(id, tenant);
        }
        map.entry(DEFAULT_TENANT_ID.to_string())
            .or_insert_with(TenantConfig::default_tenant);
        Self { tenants: map }
    }

    /// Load tenants from a JSON array file
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self, TenantError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| TenantError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let registry = Self::from_reader(BufReader::new(file))?;
        info!("Loaded {} tenants from {}", registry.len(), path.display());
        Ok(registry)
    }

    /// Load tenants from any JSON reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TenantError> {
        let tenants: Vec<TenantConfig> = serde_json::from_reader(reader)?;
        Ok(Self::from_tenants(tenants))
    }

    /// Canonical id for a raw tenant value, or `default` when unknown
    pub fn normalize_tenant_id(&self, raw: Option<&str>) -> &str {
        let folded = raw.map(fold_id).unwrap_or_default();
        match self.tenants.get_key_value(folded.as_str()) {
            Some((id, _)) => id.as_str(),
            None => {
                if !folded.is_empty() {
                    debug!("Unknown tenant '{}', using default", folded);
                }
                DEFAULT_TENANT_ID
            }
        }
    }

    /// Configuration for a raw tenant value; never fails
    pub fn get_tenant_config(&self, raw: Option<&str>) -> &TenantConfig {
        let id = self.normalize_tenant_id(raw);
        &self.tenants[id]
    }

    pub fn tenant_ids(&self) -> impl Iterator<Item = &str> {
        self.tenants.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tenants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tenants.is_empty()
    }
}

fn fold_id(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}
