//! ServiceKey - (category, tool) の複合キー
//!
//! Category と ToolName はどちらも trim + 大文字化で正規化してから保持します。
//! 呼び出し側は tool 名を任意の大文字小文字で渡してくるため、
//! `"QueryWarning"` と `"QUERYWARNING"` は同じキーになります。
//!
//! # 学習ポイント
//! - Newtype パターン（正規化済みであることを型で表す）
//! - `TryFrom<&str>` で検証付きの構築
//! - `Hash + Eq` を derive して HashMap のキーにする

use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::RegistryError;

/// batch-process 系カテゴリのプレフィックス（例: `BATCH-PROCESS:IGNORE`）
pub const BATCH_PROCESS_PREFIX: &str = "BATCH-PROCESS:";

fn normalize(value: &str) -> String {
    value.trim().to_uppercase()
}

/// Category は capability family を識別するトークン
///
/// 空文字は `MalformedKey` になります。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Category(String);

impl Category {
    pub fn new(value: &str) -> Result<Self, RegistryError> {
        let normalized = normalize(value);
        if normalized.is_empty() {
            return Err(RegistryError::malformed("category", value, "must not be empty"));
        }
        Ok(Self(normalized))
    }

    /// BizOperation から category を導出
    ///
    /// batch-process は sub-type を畳み込んだ `BATCH-PROCESS:<BIZ_TYPE>` になる。
    pub fn from_operation(op: &BizOperation<'_>) -> Result<Self, RegistryError> {
        match op {
            BizOperation::QueryWarning => Ok(Self("QUERY-WARNING".to_string())),
            BizOperation::DefectOperate => Ok(Self("DEFECT-OPERATE".to_string())),
            BizOperation::BatchProcess { biz_type } => {
                let sub_type = normalize(biz_type);
                if sub_type.is_empty() {
                    return Err(RegistryError::malformed(
                        "biz_type",
                        biz_type,
                        "batch sub-type must not be empty",
                    ));
                }
                if !sub_type
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
                {
                    return Err(RegistryError::malformed(
                        "biz_type",
                        biz_type,
                        "batch sub-type may only contain ASCII letters, digits, '_' and '-'",
                    ));
                }
                Ok(Self(format!("{BATCH_PROCESS_PREFIX}{sub_type}")))
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Category {
    type Error = RegistryError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for Category {
    type Error = RegistryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// ToolName は告警を出したツール、または DEFAULT センチネル
///
/// `"default"` と `"common"` はどちらも DEFAULT に正規化されます。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ToolName(String);

impl ToolName {
    const DEFAULT_TOKEN: &'static str = "DEFAULT";
    const COMMON_ALIAS: &'static str = "COMMON";

    pub fn new(value: &str) -> Result<Self, RegistryError> {
        let normalized = normalize(value);
        if normalized.is_empty() {
            return Err(RegistryError::malformed("tool", value, "must not be empty"));
        }
        if normalized == Self::COMMON_ALIAS {
            return Ok(Self::default_tool());
        }
        Ok(Self(normalized))
    }

    /// tool 非依存の実装を表すセンチネル
    pub fn default_tool() -> Self {
        Self(Self::DEFAULT_TOKEN.to_string())
    }

    pub fn is_default(&self) -> bool {
        self.0 == Self::DEFAULT_TOKEN
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for ToolName {
    type Error = RegistryError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for ToolName {
    type Error = RegistryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<ToolName> for String {
    fn from(tool: ToolName) -> Self {
        tool.0
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// ServiceKey は catalog のキー
///
/// 等価性は正規化後の (category, tool) で決まります。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ServiceKey {
    pub category: Category,
    pub tool: ToolName,
}

impl ServiceKey {
    pub fn new(category: Category, tool: ToolName) -> Self {
        Self { category, tool }
    }

    /// 生の文字列から正規化して構築
    pub fn parse(category: &str, tool: &str) -> Result<Self, RegistryError> {
        Ok(Self::new(Category::new(category)?, ToolName::new(tool)?))
    }

    /// 同じ category の DEFAULT キー
    pub fn with_default_tool(&self) -> Self {
        Self::new(self.category.clone(), ToolName::default_tool())
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category, self.tool)
    }
}

/// BizOperation はリクエストが要求する業務操作の記述子
///
/// batch 操作は汎用の "batch" マーカーと具体的な sub-type の両方を持つので、
/// category の導出時に sub-type を畳み込みます。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BizOperation<'a> {
    QueryWarning,
    DefectOperate,
    BatchProcess { biz_type: &'a str },
}

impl BizOperation<'_> {
    pub fn category(&self) -> Result<Category, RegistryError> {
        Category::from_operation(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::lower("query-warning", "QUERY-WARNING")]
    #[case::mixed("Query-Warning", "QUERY-WARNING")]
    #[case::padded("  defect-operate ", "DEFECT-OPERATE")]
    fn category_is_normalized(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(Category::new(raw).unwrap().as_str(), expected);
    }

    #[rstest]
    #[case::empty("")]
    #[case::blank("   ")]
    fn empty_category_is_malformed(#[case] raw: &str) {
        let err = Category::new(raw).unwrap_err();
        assert!(matches!(err, RegistryError::MalformedKey { field: "category", .. }));
    }

    #[rstest]
    #[case::default_lower("default")]
    #[case::default_upper("DEFAULT")]
    #[case::common("Common")]
    fn default_aliases_collapse_to_sentinel(#[case] raw: &str) {
        let tool = ToolName::new(raw).unwrap();
        assert!(tool.is_default());
        assert_eq!(tool, ToolName::default_tool());
    }

    #[test]
    fn blank_tool_is_malformed() {
        assert!(matches!(
            ToolName::new(" "),
            Err(RegistryError::MalformedKey { field: "tool", .. })
        ));
    }

    #[test]
    fn keys_compare_after_normalization() {
        let a = ServiceKey::parse("Query", "ToolA").unwrap();
        let b = ServiceKey::parse("QUERY", "toola").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "QUERY/TOOLA");
    }

    #[test]
    fn default_key_keeps_category() {
        let key = ServiceKey::parse("query-warning", "lint").unwrap();
        let fallback = key.with_default_tool();
        assert_eq!(fallback.category, key.category);
        assert!(fallback.tool.is_default());
    }

    #[rstest]
    #[case::query(BizOperation::QueryWarning, "QUERY-WARNING")]
    #[case::operate(BizOperation::DefectOperate, "DEFECT-OPERATE")]
    #[case::batch(BizOperation::BatchProcess { biz_type: "ignore" }, "BATCH-PROCESS:IGNORE")]
    #[case::batch_snake(
        BizOperation::BatchProcess { biz_type: "Assign_Author" },
        "BATCH-PROCESS:ASSIGN_AUTHOR"
    )]
    fn operation_derives_category(#[case] op: BizOperation<'static>, #[case] expected: &str) {
        assert_eq!(op.category().unwrap().as_str(), expected);
    }

    #[rstest]
    #[case::empty("")]
    #[case::blank("  ")]
    #[case::separator("IGNORE:X")]
    #[case::space("MARK AS FIXED")]
    fn invalid_batch_sub_type_is_malformed(#[case] biz_type: &str) {
        let err = BizOperation::BatchProcess { biz_type }.category().unwrap_err();
        assert!(matches!(err, RegistryError::MalformedKey { field: "biz_type", .. }));
    }

    #[test]
    fn category_deserializes_with_normalization() {
        let category: Category = serde_json::from_str("\"batch-process:ignore\"").unwrap();
        assert_eq!(category.as_str(), "BATCH-PROCESS:IGNORE");
        assert!(serde_json::from_str::<Category>("\"\"").is_err());
    }
}
