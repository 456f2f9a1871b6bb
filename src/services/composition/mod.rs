//! 成绩合成服务

pub mod compute;
pub mod manual;
pub mod recompute;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::storage::Storage;

pub use compute::compose;
pub use manual::set_manual_score;
pub use recompute::recompute_enrollment;

pub struct CompositionService {
    storage: Option<Arc<dyn Storage>>,
}

impl CompositionService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        super::resolve_storage(self.storage.as_ref(), request)
    }

    /// 重新计算学生课程成绩
    pub async fn recompute(
        &self,
        request: &HttpRequest,
        course_id: i64,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        recompute::handle_recompute(self, request, course_id, student_id).await
    }

    /// 设置手动评分
    pub async fn set_manual_score(
        &self,
        request: &HttpRequest,
        course_id: i64,
        student_id: i64,
        value: f64,
    ) -> ActixResult<HttpResponse> {
        manual::handle_set_manual_score(self, request, course_id, student_id, value).await
    }
}
