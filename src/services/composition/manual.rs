use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::info;

use super::CompositionService;
use super::compute::clamp_manual;
use super::recompute::{load_enrollment, rebuild};
use crate::errors::{LmsError, Result};
use crate::models::ApiResponse;
use crate::models::courses::entities::Enrollment;
use crate::models::courses::responses::EnrollmentScoreResponse;
use crate::storage::Storage;

/// 设置手动评分：截断到 [0, 60] 后与测验部分一起重新合成
pub async fn set_manual_score(
    storage: &Arc<dyn Storage>,
    student_id: i64,
    course_id: i64,
    value: f64,
) -> Result<Enrollment> {
    if !value.is_finite() {
        return Err(LmsError::validation("手动评分必须是有效数字"));
    }

    let enrollment = load_enrollment(storage, student_id, course_id).await?;
    let manual = clamp_manual(value);
    if manual != value {
        info!("Manual score {value} for student {student_id} clamped to {manual}");
    }

    rebuild(storage, enrollment, manual).await
}

/// PUT /courses/{id}/students/{student_id}/manual-score
pub async fn handle_set_manual_score(
    service: &CompositionService,
    request: &HttpRequest,
    course_id: i64,
    student_id: i64,
    value: f64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match set_manual_score(&storage, student_id, course_id, value).await {
        Ok(enrollment) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            EnrollmentScoreResponse::from(enrollment),
            "手动评分已更新",
        ))),
        Err(e) => Ok(e.to_http_response()),
    }
}
