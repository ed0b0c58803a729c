//! Errors - エラー型と分類
//!
//! `RegistryError` はキー構築・登録・解決のすべての失敗を表します。
//! どれもリクエスト（または起動処理）にローカルで、部分的な副作用はありません。

use thiserror::Error;

use super::key::ServiceKey;
use super::policy::FallbackPolicy;

/// ErrorKind は運用上の分類
///
/// - InvalidRequest: 呼び出し側のキーが不正
/// - Unsupported: tool と操作の組み合わせに実装がない
/// - Wiring: 起動時の組み立てミス（登録の衝突・凍結後の登録・capability 不一致）
///
/// どの分類もリトライで解決しません。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidRequest,
    Unsupported,
    Wiring,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("malformed {field} '{value}': {reason}")]
    MalformedKey {
        field: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("duplicate registration for {key} (capability {capability})")]
    DuplicateRegistration {
        key: ServiceKey,
        capability: &'static str,
    },

    #[error("catalog is frozen; refused to {attempted}")]
    ImmutabilityViolation { attempted: String },

    /// category / tool は正規化後（trim + 大文字化）のトークン
    #[error("no {capability} registered for category={category} tool={tool}")]
    ServiceNotFound {
        category: String,
        tool: String,
        capability: &'static str,
    },

    #[error("entry {key} implements {registered}, not the requested {expected}")]
    CapabilityMismatch {
        key: ServiceKey,
        expected: &'static str,
        registered: &'static str,
    },

    #[error("catalog must be frozen before resolution")]
    NotFrozen,

    #[error("category {category} already declared as {declared:?}, cannot redeclare as {requested:?}")]
    PolicyConflict {
        category: String,
        declared: FallbackPolicy,
        requested: FallbackPolicy,
    },
}

impl RegistryError {
    pub(crate) fn malformed(field: &'static str, value: &str, reason: &'static str) -> Self {
        Self::MalformedKey {
            field,
            value: value.to_string(),
            reason,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedKey { .. } => ErrorKind::InvalidRequest,
            Self::ServiceNotFound { .. } => ErrorKind::Unsupported,
            Self::DuplicateRegistration { .. }
            | Self::ImmutabilityViolation { .. }
            | Self::CapabilityMismatch { .. }
            | Self::NotFrozen
            | Self::PolicyConflict { .. } => ErrorKind::Wiring,
        }
    }
}

/// ServiceError は業務サービス実装側の失敗
///
/// registry はこのエラーを解釈しません。facade がそのまま呼び出し側に返します。
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_unsupported() {
        let err = RegistryError::ServiceNotFound {
            category: "DEFECT-OPERATE".into(),
            tool: "lint".into(),
            capability: "DefectOperateService",
        };
        assert_eq!(err.kind(), ErrorKind::Unsupported);
        let msg = err.to_string();
        assert!(msg.contains("DEFECT-OPERATE"));
        assert!(msg.contains("lint"));
        assert!(msg.contains("DefectOperateService"));
    }

    #[test]
    fn mismatch_is_wiring_not_unsupported() {
        let err = RegistryError::CapabilityMismatch {
            key: ServiceKey::parse("query-warning", "lint").unwrap(),
            expected: "QueryWarningService",
            registered: "BatchProcessService",
        };
        assert_eq!(err.kind(), ErrorKind::Wiring);
        assert!(err.to_string().contains("QUERY-WARNING/LINT"));
    }

    #[test]
    fn malformed_key_is_invalid_request() {
        let err = RegistryError::malformed("tool", "", "must not be empty");
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    }
}
