//! 提交生命周期服务

pub mod create;
pub mod grade;
pub mod lifecycle;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::submissions::requests::{CreateSubmissionRequest, GradeSubmissionRequest};
use crate::storage::Storage;

pub use create::create_submission;
pub use grade::grade_submission;
pub use list::list_assignment_submissions;

pub struct SubmissionService {
    storage: Option<Arc<dyn Storage>>,
}

impl SubmissionService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        super::resolve_storage(self.storage.as_ref(), request)
    }

    /// 创建提交
    pub async fn create_submission(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        req: CreateSubmissionRequest,
    ) -> ActixResult<HttpResponse> {
        create::handle_create_submission(self, request, assignment_id, req).await
    }

    /// 评分
    pub async fn grade_submission(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        student_id: i64,
        req: GradeSubmissionRequest,
    ) -> ActixResult<HttpResponse> {
        grade::handle_grade_submission(self, request, assignment_id, student_id, req).await
    }

    /// 作业提交概览
    pub async fn list_submissions(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        list::handle_list_submissions(self, request, assignment_id).await
    }
}
