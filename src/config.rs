use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Per-component aggregation weights. Callers supplying custom weights are
/// responsible for making them sum to 1; the engine treats them as if they do.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ComponentWeights {
    pub text: f64,
    pub url: f64,
    pub sender: f64,
}

impl Default for ComponentWeights {
    fn default() -> Self {
        Self {
            text: 0.35,
            url: 0.40,
            sender: 0.25,
        }
    }
}

/// Risk-band boundaries. Tenants may move the boundaries but the band order
/// is fixed: Safe below, Caution between, High-Risk above.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BandBoundaries {
    /// Highest score still considered Safe.
    pub safe_max: u32,
    /// Highest score still considered Caution.
    pub caution_max: u32,
}

impl Default for BandBoundaries {
    fn default() -> Self {
        Self {
            safe_max: 29,
            caution_max: 69,
        }
    }
}

impl BandBoundaries {
    pub fn is_valid(&self) -> bool {
        self.safe_max < self.caution_max && self.caution_max < 100
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TenantConfig {
    #[serde(default)]
    pub weights: Option<ComponentWeights>,
    #[serde(default)]
    pub bands: Option<BandBoundaries>,
}

/// Process-wide engine configuration, read-only after load. A missing file,
/// missing tenant, or invalid override falls back to defaults; configuration
/// problems never fail a scan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub tenants: HashMap<String, TenantConfig>,
}

/// Weights and boundaries resolved for one scan.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolvedTenant {
    pub weights: ComponentWeights,
    pub bands: BandBoundaries,
}

impl EngineConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: EngineConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Resolve weights/bands for a tenant, falling back to defaults for an
    /// unknown tenant or an invalid band override.
    pub fn resolve(&self, tenant_id: Option<&str>) -> ResolvedTenant {
        let mut resolved = ResolvedTenant::default();

        let Some(id) = tenant_id else {
            return resolved;
        };

        match self.tenants.get(id) {
            Some(tenant) => {
                if let Some(weights) = tenant.weights {
                    resolved.weights = weights;
                }
                if let Some(bands) = tenant.bands {
                    if bands.is_valid() {
                        resolved.bands = bands;
                    } else {
                        log::warn!(
                            "Tenant {id}: invalid band boundaries ({}, {}), using defaults",
                            bands.safe_max,
                            bands.caution_max
                        );
                    }
                }
            }
            None => {
                log::debug!("No configuration for tenant {id}, using defaults");
            }
        }

        resolved
    }
}
