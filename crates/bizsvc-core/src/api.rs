//! DefectApi - request handler 側の facade
//!
//! 各メソッドは (category, tool) から capability を解決し、
//! そのメソッドを 1 回呼ぶだけです。tool 名で分岐することはありません
//! （例外は CLOC 専用の `query_cloc_list` の入力チェックだけ）。
//! 認証・入力検証・ページングの意味論は外側の責務です。

use std::collections::BTreeSet;

use tracing::instrument;

use crate::capability::{BatchProcessService, DefectOperateService, QueryWarningService};
use crate::domain::errors::{RegistryError, ServiceError};
use crate::domain::key::{BizOperation, ServiceKey, ToolName};
use crate::domain::request::{
    BatchDefectProcessRequest, ClocOrder, DefectDetailRequest, DefectDetailResponse,
    DefectQueryRequest, DefectQueryResponse, DeptTaskDefectRequest, DeptTaskDefectResponse,
    FileContentSegmentRequest, PageInitResponse, PageRequest, SingleComment, SortSpec,
};
use crate::resolver::Resolver;

/// status クエリパラメータの区切り文字
const STATUS_SEPARATOR: char = ',';

/// 行数集計の一覧を持つ唯一の tool
const CLOC_TOOL: &str = "CLOC";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    /// facade 自身の入力チェックで弾いたもの。registry までは届いていない
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

#[derive(Debug, Clone)]
pub struct DefectApi {
    resolver: Resolver,
}

impl DefectApi {
    pub fn new(resolver: Resolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    #[instrument(skip(self), err)]
    pub async fn query_checkers_and_authors(
        &self,
        task_id: i64,
        tool_name: &str,
        status: Option<&str>,
    ) -> Result<PageInitResponse, ApiError> {
        let service = self
            .resolver
            .resolve_operation::<dyn QueryWarningService>(&BizOperation::QueryWarning, tool_name)?;
        let status = status.and_then(split_status);
        Ok(service
            .process_page_init_request(task_id, tool_name, status.as_ref())
            .await?)
    }

    #[instrument(skip(self, request, page), fields(tool = %request.tool_name), err)]
    pub async fn query_defect_list(
        &self,
        task_id: i64,
        request: &DefectQueryRequest,
        page: &PageRequest,
    ) -> Result<DefectQueryResponse, ApiError> {
        let service = self.query_service(&request.tool_name)?;
        Ok(service
            .process_query_warning_request(task_id, request, page)
            .await?)
    }

    #[instrument(skip(self, request, sort), fields(tool = %request.tool_name), err)]
    pub async fn query_defect_detail(
        &self,
        task_id: i64,
        user_id: &str,
        request: &DefectDetailRequest,
        sort: &SortSpec,
    ) -> Result<DefectDetailResponse, ApiError> {
        let service = self.query_service(&request.tool_name)?;
        Ok(service
            .process_query_warning_detail_request(task_id, user_id, request, sort)
            .await?)
    }

    #[instrument(skip(self, request), fields(tool = %request.tool_name), err)]
    pub async fn get_file_content_segment(
        &self,
        task_id: i64,
        user_id: &str,
        request: &FileContentSegmentRequest,
    ) -> Result<DefectDetailResponse, ApiError> {
        let service = self.query_service(&request.tool_name)?;
        Ok(service
            .process_get_file_content_segment_request(task_id, user_id, request)
            .await?)
    }

    #[instrument(skip(self, request), fields(tool = %request.tool_name), err)]
    pub async fn page_init(
        &self,
        task_id: i64,
        request: &DefectQueryRequest,
    ) -> Result<PageInitResponse, ApiError> {
        let service = self.query_service(&request.tool_name)?;
        Ok(service.page_init(task_id, request).await?)
    }

    /// 管理者かどうかの判定は呼び出し側（認可層）で済ませてから呼ぶ
    #[instrument(skip(self, request), fields(tool = %request.tool_name), err)]
    pub async fn query_dept_task_defect(
        &self,
        request: &DeptTaskDefectRequest,
    ) -> Result<DeptTaskDefectResponse, ApiError> {
        let service = self.query_service(&request.tool_name)?;
        Ok(service.process_dept_task_defect_request(request).await?)
    }

    /// CLOC の行数一覧。CLOC 以外の tool と order 未指定は InvalidParameter。
    ///
    /// CLOC 専用の実装を exact key で取り、DEFAULT には落とさない。
    /// ページングはしない（page_num / page_size = 0）。
    #[instrument(skip(self), err)]
    pub async fn query_cloc_list(
        &self,
        task_id: i64,
        tool_name: &str,
        order: Option<ClocOrder>,
    ) -> Result<DefectQueryResponse, ApiError> {
        let tool = tool_name.trim();
        if tool.is_empty() || !tool.eq_ignore_ascii_case(CLOC_TOOL) {
            return Err(ApiError::InvalidParameter(format!(
                "tool '{tool_name}' has no line-count list"
            )));
        }
        let Some(order) = order else {
            return Err(ApiError::InvalidParameter("order is required".into()));
        };

        let key = ServiceKey::new(BizOperation::QueryWarning.category()?, ToolName::new(tool)?);
        let service = self.resolver.resolve_exact::<dyn QueryWarningService>(&key)?;
        let request = DefectQueryRequest {
            tool_name: tool_name.to_string(),
            order: Some(order),
            ..Default::default()
        };
        let page = PageRequest {
            page_num: 0,
            page_size: 0,
            ..Default::default()
        };
        Ok(service
            .process_query_warning_request(task_id, &request, &page)
            .await?)
    }

    /// task_id と操作者を request に書き込んでから biz_type ごとの実装に渡す
    #[instrument(
        skip(self, request),
        fields(tool = %request.tool_name, biz_type = %request.biz_type),
        err
    )]
    pub async fn batch_defect_process(
        &self,
        task_id: i64,
        user_name: &str,
        mut request: BatchDefectProcessRequest,
    ) -> Result<bool, ApiError> {
        request.task_id = task_id;
        request.ignore_author = Some(user_name.to_string());

        let op = BizOperation::BatchProcess {
            biz_type: &request.biz_type,
        };
        let service = self
            .resolver
            .resolve_operation::<dyn BatchProcessService>(&op, &request.tool_name)?;
        Ok(service.process_biz(&request).await?)
    }

    #[instrument(skip(self, comment), err)]
    pub async fn add_code_comment(
        &self,
        defect_id: &str,
        tool_name: &str,
        comment_id: &str,
        user_name: &str,
        comment: &SingleComment,
    ) -> Result<(), ApiError> {
        let service = self.operate_service(tool_name)?;
        Ok(service
            .add_code_comment(defect_id, comment_id, user_name, comment)
            .await?)
    }

    #[instrument(skip(self, comment), err)]
    pub async fn update_code_comment(
        &self,
        comment_id: &str,
        user_name: &str,
        tool_name: &str,
        comment: &SingleComment,
    ) -> Result<(), ApiError> {
        let service = self.operate_service(tool_name)?;
        Ok(service
            .update_code_comment(comment_id, user_name, comment)
            .await?)
    }

    #[instrument(skip(self), err)]
    pub async fn delete_code_comment(
        &self,
        comment_id: &str,
        single_comment_id: &str,
        tool_name: &str,
        user_name: &str,
    ) -> Result<(), ApiError> {
        let service = self.operate_service(tool_name)?;
        Ok(service
            .delete_code_comment(comment_id, single_comment_id, user_name)
            .await?)
    }

    fn query_service(
        &self,
        tool_name: &str,
    ) -> Result<std::sync::Arc<dyn QueryWarningService>, RegistryError> {
        self.resolver
            .resolve_operation::<dyn QueryWarningService>(&BizOperation::QueryWarning, tool_name)
    }

    fn operate_service(
        &self,
        tool_name: &str,
    ) -> Result<std::sync::Arc<dyn DefectOperateService>, RegistryError> {
        self.resolver
            .resolve_operation::<dyn DefectOperateService>(&BizOperation::DefectOperate, tool_name)
    }
}

/// `"NEW,FIXED"` -> {"NEW", "FIXED"}。空なら None。
fn split_status(raw: &str) -> Option<BTreeSet<String>> {
    let set: BTreeSet<String> = raw
        .split(STATUS_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    (!set.is_empty()).then_some(set)
}
