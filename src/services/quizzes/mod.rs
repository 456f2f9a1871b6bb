//! 测验评分服务

pub mod detail;
pub mod engine;
pub mod regrade;
pub mod start;
pub mod submit;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::error;

use crate::models::quizzes::requests::SubmitAttemptRequest;
use crate::services::composition;
use crate::storage::Storage;

pub use detail::get_attempt;
pub use engine::grade_attempt;
pub use regrade::regrade_attempt;
pub use start::start_attempt;
pub use submit::submit_attempt;

pub struct QuizService {
    storage: Option<Arc<dyn Storage>>,
}

impl QuizService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        super::resolve_storage(self.storage.as_ref(), request)
    }

    /// 开始作答
    pub async fn start_attempt(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        start::handle_start_attempt(self, request, assignment_id).await
    }

    /// 交卷
    pub async fn submit_attempt(
        &self,
        request: &HttpRequest,
        attempt_id: i64,
        req: SubmitAttemptRequest,
    ) -> ActixResult<HttpResponse> {
        submit::handle_submit_attempt(self, request, attempt_id, req).await
    }

    /// 重新评分
    pub async fn regrade_attempt(
        &self,
        request: &HttpRequest,
        attempt_id: i64,
    ) -> ActixResult<HttpResponse> {
        regrade::handle_regrade_attempt(self, request, attempt_id).await
    }

    /// 作答详情
    pub async fn get_attempt(
        &self,
        request: &HttpRequest,
        attempt_id: i64,
    ) -> ActixResult<HttpResponse> {
        detail::handle_get_attempt(self, request, attempt_id).await
    }
}

/// 作答分数变化后刷新所属选课的成绩；作答已落库，失败只记录日志
async fn refresh_course_score(storage: &Arc<dyn Storage>, assignment_id: i64, student_id: i64) {
    let course_id = match storage.get_assignment_by_id(assignment_id).await {
        Ok(Some(assignment)) => assignment.course_id,
        Ok(None) => {
            error!("Assignment {assignment_id} vanished before course score refresh");
            return;
        }
        Err(e) => {
            error!("Failed to load assignment {assignment_id} for score refresh: {e}");
            return;
        }
    };

    if let Err(e) = composition::recompute_enrollment(storage, student_id, course_id).await {
        error!("Course score refresh failed for student {student_id} in course {course_id}: {e}");
    }
}
