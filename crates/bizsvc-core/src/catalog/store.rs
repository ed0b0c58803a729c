use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tracing::{debug, info};

use super::entry::CatalogEntry;
use crate::capability::Capability;
use crate::domain::errors::RegistryError;
use crate::domain::key::{Category, ServiceKey, ToolName};
use crate::domain::policy::FallbackPolicy;
use crate::observability::{CatalogStats, CategoryStats};

/// Service catalog: (category, tool) -> capability instance.
///
/// Design:
/// - Built during startup (`&mut self`, single-threaded).
/// - `freeze()` ends the registration phase; the frozen catalog is then moved
///   into an `Arc` and read concurrently without locks.
#[derive(Debug, Default)]
pub struct ServiceCatalog {
    entries: HashMap<ServiceKey, CatalogEntry>,
    policies: HashMap<Category, FallbackPolicy>,
    frozen: bool,
}

impl ServiceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the fallback policy of a category.
    ///
    /// Redeclaring the same policy is a no-op; a different one is a wiring defect.
    pub fn declare_category(
        &mut self,
        category: &str,
        policy: FallbackPolicy,
    ) -> Result<(), RegistryError> {
        if self.frozen {
            return Err(RegistryError::ImmutabilityViolation {
                attempted: format!("declare category '{category}'"),
            });
        }
        let category = Category::new(category)?;
        match self.policies.get(&category) {
            Some(&declared) if declared != policy => Err(RegistryError::PolicyConflict {
                category: category.to_string(),
                declared,
                requested: policy,
            }),
            Some(_) => Ok(()),
            None => {
                debug!(%category, ?policy, "declared category");
                self.policies.insert(category, policy);
                Ok(())
            }
        }
    }

    /// Register `instance` as the `C` implementation for (category, tool).
    pub fn register<C: Capability + ?Sized>(
        &mut self,
        category: &str,
        tool: &str,
        instance: Arc<C>,
    ) -> Result<(), RegistryError> {
        // 凍結後は入力の妥当性に関係なく ImmutabilityViolation
        if self.frozen {
            return Err(RegistryError::ImmutabilityViolation {
                attempted: format!("register '{category}'/'{tool}'"),
            });
        }
        let key = ServiceKey::parse(category, tool)?;
        self.register_key(key, instance)
    }

    pub fn register_key<C: Capability + ?Sized>(
        &mut self,
        key: ServiceKey,
        instance: Arc<C>,
    ) -> Result<(), RegistryError> {
        if self.frozen {
            return Err(RegistryError::ImmutabilityViolation {
                attempted: format!("register {key}"),
            });
        }
        if self.entries.contains_key(&key) {
            return Err(RegistryError::DuplicateRegistration {
                key,
                capability: C::NAME,
            });
        }
        debug!(%key, capability = C::NAME, "registered service");
        self.entries.insert(key, CatalogEntry::new(instance));
        Ok(())
    }

    /// End the registration phase. Calling it again has no effect.
    pub fn freeze(&mut self) {
        if self.frozen {
            return;
        }
        self.frozen = true;
        info!(
            entries = self.entries.len(),
            categories = self.categories().len(),
            "service catalog frozen"
        );
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &ServiceKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Registered keys, sorted.
    pub fn keys(&self) -> Vec<ServiceKey> {
        let mut keys: Vec<ServiceKey> = self.entries.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Categories that have at least one entry, sorted.
    pub fn categories(&self) -> Vec<Category> {
        let mut categories: Vec<Category> =
            self.entries.keys().map(|k| k.category.clone()).collect();
        categories.sort();
        categories.dedup();
        categories
    }

    /// Declared policy, or the default policy for undeclared categories.
    pub fn fallback_policy(&self, category: &Category) -> FallbackPolicy {
        self.policies.get(category).copied().unwrap_or_default()
    }

    pub fn has_default(&self, category: &Category) -> bool {
        self.entries.contains_key(&ServiceKey::new(
            category.clone(),
            ToolName::default_tool(),
        ))
    }

    pub(crate) fn lookup(&self, key: &ServiceKey) -> Option<&CatalogEntry> {
        self.entries.get(key)
    }

    pub fn stats(&self) -> CatalogStats {
        let mut by_category: BTreeMap<String, CategoryStats> = BTreeMap::new();
        for key in self.keys() {
            let Some(entry) = self.entries.get(&key) else {
                continue;
            };
            let stats = by_category
                .entry(key.category.to_string())
                .or_insert_with(|| CategoryStats {
                    fallback: self.fallback_policy(&key.category),
                    ..Default::default()
                });
            let capability = entry.capability().to_string();
            if !stats.capabilities.contains(&capability) {
                stats.capabilities.push(capability);
            }
            if key.tool.is_default() {
                stats.has_default = true;
            } else {
                stats.tools.push(key.tool.to_string());
            }
        }
        for stats in by_category.values_mut() {
            stats.capabilities.sort();
        }
        CatalogStats {
            frozen: self.frozen,
            entries: self.entries.len(),
            categories: by_category,
        }
    }
}
