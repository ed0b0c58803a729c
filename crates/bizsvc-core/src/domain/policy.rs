//! FallbackPolicy - category ごとの DEFAULT フォールバック規則
//!
//! フォールバックするかどうかは登録順や登録内容から暗黙に決まるのではなく、
//! category の宣言として明示します。

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FallbackPolicy {
    /// exact が見つからなければ (category, DEFAULT) を試す
    #[default]
    ToDefault,

    /// exact 一致のみ
    ExactOnly,
}

impl FallbackPolicy {
    pub fn allows_default(self) -> bool {
        matches!(self, Self::ToDefault)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undeclared_categories_fall_back() {
        assert_eq!(FallbackPolicy::default(), FallbackPolicy::ToDefault);
        assert!(FallbackPolicy::default().allows_default());
        assert!(!FallbackPolicy::ExactOnly.allows_default());
    }

    #[test]
    fn serializes_kebab_case() {
        let json = serde_json::to_string(&FallbackPolicy::ExactOnly).unwrap();
        assert_eq!(json, "\"exact-only\"");
        let parsed: FallbackPolicy = serde_json::from_str("\"to-default\"").unwrap();
        assert_eq!(parsed, FallbackPolicy::ToDefault);
    }
}
