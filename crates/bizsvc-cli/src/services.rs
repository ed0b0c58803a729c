//! デモ用の業務サービス実装
//!
//! 本番では永続化層を叩く実装が入る場所。ここではメモリ上の固定データを返し、
//! どの実装が選ばれたかを `detail` / tool_name で見えるようにしている。

use async_trait::async_trait;
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicU64, Ordering};

use bizsvc_core::domain::request::{
    BatchDefectProcessRequest, ClocOrder, DefectDetailRequest, DefectDetailResponse,
    DefectQueryRequest, DefectQueryResponse, DeptTaskDefectRequest, DeptTaskDefectResponse,
    FileContentSegmentRequest, PageInitResponse, PageRequest, SingleComment, SortSpec,
};
use bizsvc_core::{BatchProcessService, DefectOperateService, QueryWarningService, ServiceError};

/// Sample defect row used by the demo query services.
struct SampleDefect {
    checker: &'static str,
    author: &'static str,
    status: &'static str,
    file_path: &'static str,
    line: u32,
}

const SAMPLE_DEFECTS: &[SampleDefect] = &[
    SampleDefect { checker: "unused-variable", author: "alice", status: "NEW", file_path: "src/lib.c", line: 12 },
    SampleDefect { checker: "null-dereference", author: "bob", status: "NEW", file_path: "src/io.c", line: 88 },
    SampleDefect { checker: "unused-variable", author: "carol", status: "FIXED", file_path: "src/io.c", line: 140 },
    SampleDefect { checker: "shadowed-name", author: "alice", status: "IGNORE", file_path: "src/main.c", line: 7 },
];

const DEMO_TASK_ID: i64 = 1;

/// Tool-agnostic warning queries over the sample defects.
pub struct CommonQueryWarningService;

impl CommonQueryWarningService {
    fn matching<'a>(
        status: Option<&'a BTreeSet<String>>,
    ) -> impl Iterator<Item = &'static SampleDefect> + 'a {
        SAMPLE_DEFECTS
            .iter()
            .filter(move |d| status.is_none_or(|s| s.contains(d.status)))
    }

    fn page_init_for(tool_name: &str, status: Option<&BTreeSet<String>>) -> PageInitResponse {
        let mut rsp = PageInitResponse {
            tool_name: tool_name.to_string(),
            ..Default::default()
        };
        for defect in Self::matching(status) {
            rsp.checkers.insert(defect.checker.to_string());
            rsp.authors.insert(defect.author.to_string());
            *rsp.status_counts.entry(defect.status.to_string()).or_default() += 1;
        }
        rsp
    }
}

#[async_trait]
impl QueryWarningService for CommonQueryWarningService {
    async fn process_page_init_request(
        &self,
        _task_id: i64,
        tool_name: &str,
        status: Option<&BTreeSet<String>>,
    ) -> Result<PageInitResponse, ServiceError> {
        Ok(Self::page_init_for(tool_name, status))
    }

    async fn process_query_warning_request(
        &self,
        _task_id: i64,
        request: &DefectQueryRequest,
        page: &PageRequest,
    ) -> Result<DefectQueryResponse, ServiceError> {
        if page.page_size == 0 {
            return Err(ServiceError::InvalidArgument("page_size must be positive".into()));
        }
        let status = (!request.status.is_empty()).then_some(&request.status);
        let rows: Vec<&SampleDefect> = Self::matching(status)
            .filter(|d| request.checker.as_deref().is_none_or(|c| c == d.checker))
            .filter(|d| request.author.as_deref().is_none_or(|a| a == d.author))
            .collect();
        let skip = (page.page_num.saturating_sub(1) as usize) * page.page_size as usize;
        let records = rows
            .iter()
            .skip(skip)
            .take(page.page_size as usize)
            .map(|d| {
                json!({
                    "checker": d.checker,
                    "author": d.author,
                    "status": d.status,
                    "filePath": d.file_path,
                    "line": d.line,
                })
            })
            .collect();
        Ok(DefectQueryResponse {
            tool_name: request.tool_name.clone(),
            total: rows.len() as u64,
            page_num: page.page_num,
            page_size: page.page_size,
            records,
        })
    }

    async fn process_query_warning_detail_request(
        &self,
        _task_id: i64,
        _user_id: &str,
        request: &DefectDetailRequest,
        _sort: &SortSpec,
    ) -> Result<DefectDetailResponse, ServiceError> {
        Ok(DefectDetailResponse {
            tool_name: request.tool_name.clone(),
            file_path: request.file_path.clone(),
            file_content: None,
            detail: json!({ "entityId": request.entity_id, "implementation": "common" }),
        })
    }

    async fn process_get_file_content_segment_request(
        &self,
        _task_id: i64,
        _user_id: &str,
        request: &FileContentSegmentRequest,
    ) -> Result<DefectDetailResponse, ServiceError> {
        if request.begin_line > request.end_line {
            return Err(ServiceError::InvalidArgument(format!(
                "begin_line {} is after end_line {}",
                request.begin_line, request.end_line
            )));
        }
        Ok(DefectDetailResponse {
            tool_name: request.tool_name.clone(),
            file_path: Some(request.file_path.clone()),
            file_content: Some(String::new()),
            detail: json!({ "beginLine": request.begin_line, "endLine": request.end_line }),
        })
    }

    async fn page_init(
        &self,
        _task_id: i64,
        request: &DefectQueryRequest,
    ) -> Result<PageInitResponse, ServiceError> {
        let status = (!request.status.is_empty()).then_some(&request.status);
        Ok(Self::page_init_for(&request.tool_name, status))
    }

    async fn process_dept_task_defect_request(
        &self,
        request: &DeptTaskDefectRequest,
    ) -> Result<DeptTaskDefectResponse, ServiceError> {
        if let (Some(start), Some(end)) = (request.start_time, request.end_time) {
            if start > end {
                return Err(ServiceError::InvalidArgument("start_time is after end_time".into()));
            }
        }
        // デモデータは 1 タスク分だけ
        let open = SAMPLE_DEFECTS.iter().filter(|d| d.status == "NEW").count();
        Ok(DeptTaskDefectResponse {
            tool_name: request.tool_name.clone(),
            total: 1,
            tasks: vec![json!({
                "taskId": DEMO_TASK_ID,
                "deptIds": request.dept_ids,
                "openDefects": open,
                "totalDefects": SAMPLE_DEFECTS.len(),
            })],
        })
    }
}

/// Line-count tool: its "defects" are per-language totals, so it overrides
/// every query operation.
pub struct ClocQueryWarningService;

/// (file, language, code lines)
const CLOC_FILES: &[(&str, &str, u64)] = &[
    ("build.sh", "Shell", 96),
    ("src/io.c", "C", 1920),
    ("src/lib.c", "C", 3200),
    ("src/main.rs", "Rust", 2048),
];

fn cloc_by_language() -> BTreeMap<String, u64> {
    let mut totals = BTreeMap::new();
    for (_, language, lines) in CLOC_FILES {
        *totals.entry(language.to_string()).or_default() += lines;
    }
    totals
}

#[async_trait]
impl QueryWarningService for ClocQueryWarningService {
    async fn process_page_init_request(
        &self,
        _task_id: i64,
        tool_name: &str,
        _status: Option<&BTreeSet<String>>,
    ) -> Result<PageInitResponse, ServiceError> {
        Ok(PageInitResponse {
            tool_name: tool_name.to_string(),
            ..Default::default()
        })
    }

    async fn process_query_warning_request(
        &self,
        _task_id: i64,
        request: &DefectQueryRequest,
        page: &PageRequest,
    ) -> Result<DefectQueryResponse, ServiceError> {
        let records: Vec<serde_json::Value> = match request.order.unwrap_or(ClocOrder::Language) {
            ClocOrder::Language => cloc_by_language()
                .into_iter()
                .map(|(language, lines)| json!({ "language": language, "codeLines": lines }))
                .collect(),
            ClocOrder::FilePath => CLOC_FILES
                .iter()
                .map(|(path, language, lines)| {
                    json!({ "filePath": path, "language": language, "codeLines": lines })
                })
                .collect(),
        };
        Ok(DefectQueryResponse {
            tool_name: request.tool_name.clone(),
            total: records.len() as u64,
            page_num: page.page_num,
            page_size: page.page_size,
            records,
        })
    }

    async fn process_query_warning_detail_request(
        &self,
        _task_id: i64,
        _user_id: &str,
        _request: &DefectDetailRequest,
        _sort: &SortSpec,
    ) -> Result<DefectDetailResponse, ServiceError> {
        Err(ServiceError::Failed("cloc results have no per-defect detail".into()))
    }

    async fn process_get_file_content_segment_request(
        &self,
        _task_id: i64,
        _user_id: &str,
        _request: &FileContentSegmentRequest,
    ) -> Result<DefectDetailResponse, ServiceError> {
        Err(ServiceError::Failed("cloc results have no file segments".into()))
    }

    async fn page_init(
        &self,
        _task_id: i64,
        request: &DefectQueryRequest,
    ) -> Result<PageInitResponse, ServiceError> {
        Ok(PageInitResponse {
            tool_name: request.tool_name.clone(),
            status_counts: cloc_by_language(),
            ..Default::default()
        })
    }

    async fn process_dept_task_defect_request(
        &self,
        _request: &DeptTaskDefectRequest,
    ) -> Result<DeptTaskDefectResponse, ServiceError> {
        Err(ServiceError::Failed("cloc has no per-department defect totals".into()))
    }
}

/// Comment operations; counts calls instead of persisting.
#[derive(Default)]
pub struct CommonDefectOperateService {
    operations: AtomicU64,
}

impl CommonDefectOperateService {
    fn record(&self, op: &str, comment_id: &str, user_name: &str) {
        let n = self.operations.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::info!(op, comment_id, user_name, total = n, "code comment operation");
    }
}

#[async_trait]
impl DefectOperateService for CommonDefectOperateService {
    async fn add_code_comment(
        &self,
        _defect_id: &str,
        comment_id: &str,
        user_name: &str,
        comment: &SingleComment,
    ) -> Result<(), ServiceError> {
        if comment.comment.trim().is_empty() {
            return Err(ServiceError::InvalidArgument("comment must not be empty".into()));
        }
        self.record("add", comment_id, user_name);
        Ok(())
    }

    async fn update_code_comment(
        &self,
        comment_id: &str,
        user_name: &str,
        _comment: &SingleComment,
    ) -> Result<(), ServiceError> {
        self.record("update", comment_id, user_name);
        Ok(())
    }

    async fn delete_code_comment(
        &self,
        comment_id: &str,
        _single_comment_id: &str,
        user_name: &str,
    ) -> Result<(), ServiceError> {
        self.record("delete", comment_id, user_name);
        Ok(())
    }
}

/// Marks the given defects as ignored.
pub struct IgnoreBatchProcessor;

#[async_trait]
impl BatchProcessService for IgnoreBatchProcessor {
    async fn process_biz(&self, request: &BatchDefectProcessRequest) -> Result<bool, ServiceError> {
        if request.defect_keys.is_empty() {
            return Ok(false);
        }
        tracing::info!(
            task_id = request.task_id,
            author = request.ignore_author.as_deref().unwrap_or_default(),
            defects = request.defect_keys.len(),
            "ignored defects"
        );
        Ok(true)
    }
}

/// Reassigns the given defects to a new author.
pub struct AssignBatchProcessor;

#[async_trait]
impl BatchProcessService for AssignBatchProcessor {
    async fn process_biz(&self, request: &BatchDefectProcessRequest) -> Result<bool, ServiceError> {
        let Some(author) = request.ignore_author.as_deref() else {
            return Err(ServiceError::InvalidArgument("operator is required".into()));
        };
        tracing::info!(
            task_id = request.task_id,
            author,
            defects = request.defect_keys.len(),
            "assigned defects"
        );
        Ok(!request.defect_keys.is_empty())
    }
}
