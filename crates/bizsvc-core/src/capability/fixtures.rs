// テスト用の capability 実装。label で「どのインスタンスが選ばれたか」を判別する。

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Mutex;

use super::services::{BatchProcessService, DefectOperateService, QueryWarningService};
use crate::domain::errors::ServiceError;
use crate::domain::request::{
    BatchDefectProcessRequest, DefectDetailRequest, DefectDetailResponse, DefectQueryRequest,
    DefectQueryResponse, DeptTaskDefectRequest, DeptTaskDefectResponse,
    FileContentSegmentRequest, PageInitResponse, PageRequest, SingleComment, SortSpec,
};

pub(crate) struct LabeledQueryService {
    pub label: &'static str,
    pub seen_status: Mutex<Option<BTreeSet<String>>>,
}

impl LabeledQueryService {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            seen_status: Mutex::new(None),
        }
    }
}

#[async_trait]
impl QueryWarningService for LabeledQueryService {
    async fn process_page_init_request(
        &self,
        _task_id: i64,
        _tool_name: &str,
        status: Option<&BTreeSet<String>>,
    ) -> Result<PageInitResponse, ServiceError> {
        *self.seen_status.lock().unwrap() = status.cloned();
        Ok(PageInitResponse {
            tool_name: self.label.to_string(),
            ..Default::default()
        })
    }

    async fn process_query_warning_request(
        &self,
        _task_id: i64,
        _request: &DefectQueryRequest,
        page: &PageRequest,
    ) -> Result<DefectQueryResponse, ServiceError> {
        Ok(DefectQueryResponse {
            tool_name: self.label.to_string(),
            total: 0,
            page_num: page.page_num,
            page_size: page.page_size,
            records: Vec::new(),
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
            tool_name: self.label.to_string(),
            file_path: request.file_path.clone(),
            ..Default::default()
        })
    }

    async fn process_get_file_content_segment_request(
        &self,
        _task_id: i64,
        _user_id: &str,
        request: &FileContentSegmentRequest,
    ) -> Result<DefectDetailResponse, ServiceError> {
        if request.begin_line > request.end_line {
            return Err(ServiceError::InvalidArgument("begin_line > end_line".into()));
        }
        Ok(DefectDetailResponse {
            tool_name: self.label.to_string(),
            file_path: Some(request.file_path.clone()),
            ..Default::default()
        })
    }

    async fn page_init(
        &self,
        _task_id: i64,
        _request: &DefectQueryRequest,
    ) -> Result<PageInitResponse, ServiceError> {
        Ok(PageInitResponse {
            tool_name: self.label.to_string(),
            ..Default::default()
        })
    }

    async fn process_dept_task_defect_request(
        &self,
        request: &DeptTaskDefectRequest,
    ) -> Result<DeptTaskDefectResponse, ServiceError> {
        Ok(DeptTaskDefectResponse {
            tool_name: self.label.to_string(),
            total: request.dept_ids.len() as u64,
            tasks: Vec::new(),
        })
    }
}

#[derive(Default)]
pub(crate) struct RecordingOperateService {
    pub ops: Mutex<Vec<String>>,
}

#[async_trait]
impl DefectOperateService for RecordingOperateService {
    async fn add_code_comment(
        &self,
        defect_id: &str,
        comment_id: &str,
        user_name: &str,
        _comment: &SingleComment,
    ) -> Result<(), ServiceError> {
        self.ops
            .lock()
            .unwrap()
            .push(format!("add {defect_id} {comment_id} {user_name}"));
        Ok(())
    }

    async fn update_code_comment(
        &self,
        comment_id: &str,
        user_name: &str,
        _comment: &SingleComment,
    ) -> Result<(), ServiceError> {
        self.ops
            .lock()
            .unwrap()
            .push(format!("update {comment_id} {user_name}"));
        Ok(())
    }

    async fn delete_code_comment(
        &self,
        comment_id: &str,
        single_comment_id: &str,
        user_name: &str,
    ) -> Result<(), ServiceError> {
        self.ops
            .lock()
            .unwrap()
            .push(format!("delete {comment_id} {single_comment_id} {user_name}"));
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct RecordingBatchService {
    pub seen: Mutex<Vec<BatchDefectProcessRequest>>,
}

#[async_trait]
impl BatchProcessService for RecordingBatchService {
    async fn process_biz(&self, request: &BatchDefectProcessRequest) -> Result<bool, ServiceError> {
        self.seen.lock().unwrap().push(request.clone());
        Ok(!request.defect_keys.is_empty())
    }
}
