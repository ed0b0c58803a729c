//! Request / response value objects carried through the capability contracts.
//!
//! The registry never looks inside these; they only give the capability traits
//! a concrete signature. Shapes follow the JSON the defect API exchanges, so
//! fields are camelCase on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Sort order requested by the caller. Interpretation is up to the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_field: Option<String>,
    #[serde(default)]
    pub sort_type: SortDirection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub page_num: u32,
    pub page_size: u32,
    #[serde(flatten)]
    pub sort: SortSpec,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page_num: 1,
            page_size: 100,
            sort: SortSpec::default(),
        }
    }
}

/// Grouping of line-count results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClocOrder {
    Language,
    FilePath,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefectQueryRequest {
    pub tool_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub status: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub file_paths: Vec<String>,
    /// Line-count tools only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<ClocOrder>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefectQueryResponse {
    pub tool_name: String,
    pub total: u64,
    pub page_num: u32,
    pub page_size: u32,
    #[serde(default)]
    pub records: Vec<serde_json::Value>,
}

/// Checker / author lists shown when the warning page opens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInitResponse {
    pub tool_name: String,
    #[serde(default)]
    pub checkers: BTreeSet<String>,
    #[serde(default)]
    pub authors: BTreeSet<String>,
    #[serde(default)]
    pub status_counts: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefectDetailRequest {
    pub tool_name: String,
    pub entity_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefectDetailResponse {
    pub tool_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_content: Option<String>,
    #[serde(default)]
    pub detail: serde_json::Value,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileContentSegmentRequest {
    pub tool_name: String,
    pub file_path: String,
    pub begin_line: u32,
    pub end_line: u32,
}

/// Defect totals per task across departments (administrator view).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeptTaskDefectRequest {
    pub tool_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dept_ids: Vec<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeptTaskDefectResponse {
    pub tool_name: String,
    pub total: u64,
    #[serde(default)]
    pub tasks: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleComment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub single_comment_id: Option<String>,
    pub user_name: String,
    pub comment: String,
    pub comment_time: DateTime<Utc>,
}

/// Batch operation over a set of defects (ignore, assign author, mark fixed, ...).
///
/// `biz_type` selects the batch family; `task_id` and `ignore_author` are
/// stamped by the request facade from the path and the authenticated user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchDefectProcessRequest {
    #[serde(default)]
    pub task_id: i64,
    pub tool_name: String,
    pub biz_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_reason_type: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_reason: Option<String>,
    #[serde(default)]
    pub defect_keys: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn batch_request_accepts_camel_case() {
        let req: BatchDefectProcessRequest = serde_json::from_value(json!({
            "toolName": "lint",
            "bizType": "IGNORE",
            "ignoreReasonType": 2,
            "defectKeys": ["a", "b"],
        }))
        .unwrap();
        assert_eq!(req.task_id, 0);
        assert_eq!(req.biz_type, "IGNORE");
        assert_eq!(req.ignore_reason_type, Some(2));
        assert_eq!(req.defect_keys.len(), 2);
        assert!(req.ignore_author.is_none());
    }

    #[test]
    fn cloc_order_uses_upper_snake_case() {
        let req: DefectQueryRequest = serde_json::from_value(json!({
            "toolName": "CLOC",
            "order": "FILE_PATH",
        }))
        .unwrap();
        assert_eq!(req.order, Some(ClocOrder::FilePath));

        let value = serde_json::to_value(DefectQueryRequest::default()).unwrap();
        assert!(value.get("order").is_none());
    }

    #[test]
    fn dept_request_defaults_to_all_departments() {
        let req: DeptTaskDefectRequest =
            serde_json::from_value(json!({ "toolName": "lint", "bgId": 3 })).unwrap();
        assert_eq!(req.bg_id, Some(3));
        assert!(req.dept_ids.is_empty());
        assert!(req.start_time.is_none());
    }

    #[test]
    fn page_request_flattens_sort() {
        let page = PageRequest {
            page_num: 2,
            page_size: 50,
            sort: SortSpec {
                sort_field: Some("severity".into()),
                sort_type: SortDirection::Desc,
            },
        };
        let value = serde_json::to_value(&page).unwrap();
        assert_eq!(value["sortField"], "severity");
        assert_eq!(value["sortType"], "DESC");
    }
}
