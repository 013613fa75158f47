//! Registry of critical resources.
//!
//! Classification is pure lookup and fails open: anything the registry
//! does not know is not critical and runs unguarded. The gate itself
//! fails closed later (timeouts and channel errors reject), so a gap
//! here widens the unguarded set rather than wedging remediation.

use std::collections::{HashMap, HashSet};
use std::str::FromStr as _;

use hearth_config::{CriticalId, GatingSection};
use hearth_core::{ResourceCategory, ResourceId, Severity};

use crate::error::{ApprovalError, ApprovalResult};

/// Immutable set of resources that require human sign-off, keyed by
/// category.
///
/// Built once at startup, usually via [`CriticalResources::from_config`].
/// Numeric ids match exactly; names match case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct CriticalResources {
    entries: HashMap<ResourceCategory, CriticalSet>,
    highest_risk: Option<(ResourceCategory, ResourceId)>,
}

/// Per-category membership, split so numeric and named ids never match
/// each other.
#[derive(Debug, Clone, Default)]
struct CriticalSet {
    ids: HashSet<u64>,
    /// Stored lowercase.
    names: HashSet<String>,
}

impl CriticalSet {
    fn insert(&mut self, id: ResourceId) {
        match id {
            ResourceId::Id(n) => {
                self.ids.insert(n);
            }
            ResourceId::Name(name) => {
                self.names.insert(name.to_lowercase());
            }
        }
    }

    fn contains(&self, id: &ResourceId) -> bool {
        match id {
            ResourceId::Id(n) => self.ids.contains(n),
            ResourceId::Name(name) => self.names.contains(&name.to_lowercase()),
        }
    }

    fn len(&self) -> usize {
        self.ids.len().saturating_add(self.names.len())
    }
}

impl CriticalResources {
    /// Empty registry: nothing requires approval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from the `[gating]` config section.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::UnknownCategory`] if an entry names a
    /// category the classifier does not know.
    pub fn from_config(gating: &GatingSection) -> ApprovalResult<Self> {
        let mut registry = Self::new();
        for (category, ids) in &gating.critical {
            let category = parse_category(category)?;
            for id in ids {
                registry.insert(category, to_resource_id(id));
            }
        }
        if let Some(highest) = &gating.highest_risk {
            let category = parse_category(&highest.category)?;
            registry.set_highest_risk(category, to_resource_id(&highest.id));
        }
        Ok(registry)
    }

    /// Mark `id` within `category` as critical.
    pub fn insert(&mut self, category: ResourceCategory, id: impl Into<ResourceId>) {
        self.entries.entry(category).or_default().insert(id.into());
    }

    /// Declare the single most sensitive resource. Its approval prompts
    /// escalate to critical severity. Also marks it critical.
    pub fn set_highest_risk(&mut self, category: ResourceCategory, id: impl Into<ResourceId>) {
        let id = id.into();
        self.entries.entry(category).or_default().insert(id.clone());
        self.highest_risk = Some((category, id));
    }

    /// Whether `id` in `category` requires approval before remediation.
    #[must_use]
    pub fn is_critical(&self, category: ResourceCategory, id: &ResourceId) -> bool {
        self.entries
            .get(&category)
            .is_some_and(|set| set.contains(id))
    }

    /// Whether the pair is the configured most sensitive resource.
    #[must_use]
    pub fn is_highest_risk(&self, category: ResourceCategory, id: &ResourceId) -> bool {
        self.highest_risk
            .as_ref()
            .is_some_and(|(c, highest)| *c == category && highest.matches(id))
    }

    /// Prompt severity for a critical resource.
    #[must_use]
    pub fn severity_for(&self, category: ResourceCategory, id: &ResourceId) -> Severity {
        if self.is_highest_risk(category, id) {
            Severity::Critical
        } else {
            Severity::Warning
        }
    }

    /// Total number of protected resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.values().map(CriticalSet::len).sum()
    }

    /// Whether the registry protects nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn parse_category(raw: &str) -> ApprovalResult<ResourceCategory> {
    ResourceCategory::from_str(raw).map_err(|_| ApprovalError::UnknownCategory {
        category: raw.to_string(),
    })
}

fn to_resource_id(id: &CriticalId) -> ResourceId {
    match id {
        CriticalId::Num(n) => ResourceId::Id(*n),
        CriticalId::Name(name) => ResourceId::Name(name.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_registry() -> CriticalResources {
        let mut registry = CriticalResources::new();
        registry.insert(ResourceCategory::Lxc, 200_u64);
        registry.insert(ResourceCategory::Lxc, 250_u64);
        registry.insert(ResourceCategory::Docker, "traefik");
        registry.insert(ResourceCategory::Database, "PostgreSQL");
        registry.set_highest_risk(ResourceCategory::Vm, 100_u64);
        registry
    }

    #[test]
    fn test_membership_is_exact_for_numeric_ids() {
        let registry = sample_registry();
        assert!(registry.is_critical(ResourceCategory::Lxc, &ResourceId::Id(200)));
        assert!(!registry.is_critical(ResourceCategory::Lxc, &ResourceId::Id(201)));
    }

    #[test]
    fn test_names_match_case_insensitively() {
        let registry = sample_registry();
        assert!(registry.is_critical(ResourceCategory::Docker, &ResourceId::from("Traefik")));
        assert!(registry.is_critical(ResourceCategory::Docker, &ResourceId::from("TRAEFIK")));
        assert!(registry.is_critical(ResourceCategory::Database, &ResourceId::from("postgresql")));
    }

    #[test]
    fn test_numeric_and_named_ids_never_cross_match() {
        let mut registry = CriticalResources::new();
        registry.insert(ResourceCategory::Lxc, "200");
        assert!(!registry.is_critical(ResourceCategory::Lxc, &ResourceId::Id(200)));
        assert!(registry.is_critical(ResourceCategory::Lxc, &ResourceId::from("200")));
    }

    #[test]
    fn test_unlisted_category_is_not_critical() {
        let registry = sample_registry();
        assert!(!registry.is_critical(ResourceCategory::Dns, &ResourceId::Id(200)));
        assert!(!registry.is_critical(ResourceCategory::Network, &ResourceId::from("traefik")));
    }

    #[test]
    fn test_empty_registry_protects_nothing() {
        let registry = CriticalResources::new();
        assert!(registry.is_empty());
        assert!(!registry.is_critical(ResourceCategory::Vm, &ResourceId::Id(100)));
    }

    #[test]
    fn test_highest_risk_escalates_severity() {
        let registry = sample_registry();
        assert_eq!(
            registry.severity_for(ResourceCategory::Vm, &ResourceId::Id(100)),
            Severity::Critical
        );
        assert_eq!(
            registry.severity_for(ResourceCategory::Lxc, &ResourceId::Id(200)),
            Severity::Warning
        );
        assert!(registry.is_highest_risk(ResourceCategory::Vm, &ResourceId::Id(100)));
        assert!(!registry.is_highest_risk(ResourceCategory::Lxc, &ResourceId::Id(200)));
    }

    #[test]
    fn test_highest_risk_is_implicitly_critical() {
        let mut registry = CriticalResources::new();
        registry.set_highest_risk(ResourceCategory::Vm, 100_u64);
        assert!(registry.is_critical(ResourceCategory::Vm, &ResourceId::Id(100)));
    }

    #[test]
    fn test_from_config_round_trip() {
        let gating: GatingSection = toml::from_str(
            r#"
            [critical]
            lxc = [200, 250]
            docker = ["traefik", "Pihole"]

            [highest_risk]
            category = "vm"
            id = 100
            "#,
        )
        .unwrap();
        let registry = CriticalResources::from_config(&gating).unwrap();
        assert_eq!(registry.len(), 5);
        assert!(registry.is_critical(ResourceCategory::Lxc, &ResourceId::Id(250)));
        assert!(registry.is_critical(ResourceCategory::Docker, &ResourceId::from("pihole")));
        assert!(registry.is_highest_risk(ResourceCategory::Vm, &ResourceId::Id(100)));
    }

    #[test]
    fn test_from_config_rejects_unknown_category() {
        let gating: GatingSection = toml::from_str(
            r#"
            [critical]
            kubernetes = ["control-plane"]
            "#,
        )
        .unwrap();
        let err = CriticalResources::from_config(&gating).unwrap_err();
        assert!(err.to_string().contains("kubernetes"));
    }
}
