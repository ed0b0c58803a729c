use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::policy::FallbackPolicy;

/// Snapshot of what the catalog can serve, for status output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogStats {
    pub frozen: bool,
    pub entries: usize,
    pub categories: BTreeMap<String, CategoryStats>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryStats {
    /// Distinct capabilities registered in the category, sorted. More than
    /// one means the category is miswired.
    pub capabilities: Vec<String>,
    pub fallback: FallbackPolicy,
    /// Tool-specific overrides, sorted. DEFAULT is reported via `has_default`.
    pub tools: Vec<String>,
    pub has_default: bool,
}
