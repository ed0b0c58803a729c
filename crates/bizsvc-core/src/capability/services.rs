use async_trait::async_trait;
use std::collections::BTreeSet;

use crate::domain::errors::ServiceError;
use crate::domain::request::{
    BatchDefectProcessRequest, DefectDetailRequest, DefectDetailResponse, DefectQueryRequest,
    DefectQueryResponse, DeptTaskDefectRequest, DeptTaskDefectResponse,
    FileContentSegmentRequest, PageInitResponse, PageRequest, SingleComment, SortSpec,
};

/// Warning query operations (category `QUERY-WARNING`).
///
/// Most tools share one DEFAULT implementation; tools with their own defect
/// shape (e.g. line-count tools) register an override.
#[async_trait]
pub trait QueryWarningService: Send + Sync {
    /// Checker and author lists for the warning page, filtered by status.
    async fn process_page_init_request(
        &self,
        task_id: i64,
        tool_name: &str,
        status: Option<&BTreeSet<String>>,
    ) -> Result<PageInitResponse, ServiceError>;

    async fn process_query_warning_request(
        &self,
        task_id: i64,
        request: &DefectQueryRequest,
        page: &PageRequest,
    ) -> Result<DefectQueryResponse, ServiceError>;

    async fn process_query_warning_detail_request(
        &self,
        task_id: i64,
        user_id: &str,
        request: &DefectDetailRequest,
        sort: &SortSpec,
    ) -> Result<DefectDetailResponse, ServiceError>;

    async fn process_get_file_content_segment_request(
        &self,
        task_id: i64,
        user_id: &str,
        request: &FileContentSegmentRequest,
    ) -> Result<DefectDetailResponse, ServiceError>;

    async fn page_init(
        &self,
        task_id: i64,
        request: &DefectQueryRequest,
    ) -> Result<PageInitResponse, ServiceError>;

    /// 部門単位のタスク別告警集計。管理者チェックは呼び出し側で済ませておくこと。
    async fn process_dept_task_defect_request(
        &self,
        request: &DeptTaskDefectRequest,
    ) -> Result<DeptTaskDefectResponse, ServiceError>;
}

/// Code comment operations on a single defect (category `DEFECT-OPERATE`).
#[async_trait]
pub trait DefectOperateService: Send + Sync {
    async fn add_code_comment(
        &self,
        defect_id: &str,
        comment_id: &str,
        user_name: &str,
        comment: &SingleComment,
    ) -> Result<(), ServiceError>;

    async fn update_code_comment(
        &self,
        comment_id: &str,
        user_name: &str,
        comment: &SingleComment,
    ) -> Result<(), ServiceError>;

    async fn delete_code_comment(
        &self,
        comment_id: &str,
        single_comment_id: &str,
        user_name: &str,
    ) -> Result<(), ServiceError>;
}

/// One batch family (category `BATCH-PROCESS:<BIZ_TYPE>`).
#[async_trait]
pub trait BatchProcessService: Send + Sync {
    async fn process_biz(&self, request: &BatchDefectProcessRequest) -> Result<bool, ServiceError>;
}
