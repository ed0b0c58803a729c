use std::sync::Arc;

use tracing::debug;

use crate::capability::Capability;
use crate::catalog::ServiceCatalog;
use crate::domain::errors::RegistryError;
use crate::domain::key::{BizOperation, Category, ServiceKey, ToolName};

/// Result of a resolution with the key that actually matched.
pub struct Resolution<C: Capability + ?Sized> {
    pub instance: Arc<C>,
    pub matched: ServiceKey,
    pub via_fallback: bool,
}

/// Resolver turns (capability, category, tool) into a registered instance.
///
/// Holds a frozen catalog; every method takes `&self` and performs only
/// map lookups, so one resolver is shared by all request tasks.
#[derive(Debug, Clone)]
pub struct Resolver {
    catalog: Arc<ServiceCatalog>,
}

impl Resolver {
    /// Wrap a frozen catalog. Resolution over a catalog that can still
    /// change is refused.
    pub fn new(catalog: Arc<ServiceCatalog>) -> Result<Self, RegistryError> {
        if !catalog.is_frozen() {
            return Err(RegistryError::NotFrozen);
        }
        Ok(Self { catalog })
    }

    pub fn catalog(&self) -> &ServiceCatalog {
        &self.catalog
    }

    pub fn resolve<C: Capability + ?Sized>(
        &self,
        category: &str,
        tool: &str,
    ) -> Result<Arc<C>, RegistryError> {
        self.resolve_detailed::<C>(category, tool).map(|r| r.instance)
    }

    /// Derive the category from `op` and resolve it for `tool`.
    pub fn resolve_operation<C: Capability + ?Sized>(
        &self,
        op: &BizOperation<'_>,
        tool: &str,
    ) -> Result<Arc<C>, RegistryError> {
        let category = op.category()?;
        let key = ServiceKey::new(category, ToolName::new(tool)?);
        self.resolve_key::<C>(&key).map(|r| r.instance)
    }

    pub fn resolve_detailed<C: Capability + ?Sized>(
        &self,
        category: &str,
        tool: &str,
    ) -> Result<Resolution<C>, RegistryError> {
        let key = ServiceKey::new(Category::new(category)?, ToolName::new(tool)?);
        self.resolve_key::<C>(&key)
    }

    /// Exact key only; the category's fallback policy is not consulted.
    pub fn resolve_exact<C: Capability + ?Sized>(
        &self,
        key: &ServiceKey,
    ) -> Result<Arc<C>, RegistryError> {
        match self.try_key::<C>(key, false)? {
            Some(resolution) => Ok(resolution.instance),
            None => Err(RegistryError::ServiceNotFound {
                category: key.category.to_string(),
                tool: key.tool.to_string(),
                capability: C::NAME,
            }),
        }
    }

    /// Exact key first, then (category, DEFAULT) when the category's policy
    /// allows it. An exact entry of the wrong capability is an error, it does
    /// not fall through to DEFAULT.
    pub fn resolve_key<C: Capability + ?Sized>(
        &self,
        key: &ServiceKey,
    ) -> Result<Resolution<C>, RegistryError> {
        if let Some(resolution) = self.try_key::<C>(key, false)? {
            return Ok(resolution);
        }

        let policy = self.catalog.fallback_policy(&key.category);
        if !key.tool.is_default() && policy.allows_default() {
            let default_key = key.with_default_tool();
            if let Some(resolution) = self.try_key::<C>(&default_key, true)? {
                return Ok(resolution);
            }
        }

        debug!(%key, capability = C::NAME, ?policy, "no service registered");
        Err(RegistryError::ServiceNotFound {
            category: key.category.to_string(),
            tool: key.tool.to_string(),
            capability: C::NAME,
        })
    }

    fn try_key<C: Capability + ?Sized>(
        &self,
        key: &ServiceKey,
        via_fallback: bool,
    ) -> Result<Option<Resolution<C>>, RegistryError> {
        let Some(entry) = self.catalog.lookup(key) else {
            return Ok(None);
        };
        let instance = entry
            .downcast::<C>()
            .ok_or_else(|| RegistryError::CapabilityMismatch {
                key: key.clone(),
                expected: C::NAME,
                registered: entry.capability(),
            })?;
        debug!(%key, capability = C::NAME, via_fallback, "resolved service");
        Ok(Some(Resolution {
            instance,
            matched: key.clone(),
            via_fallback,
        }))
    }
}
