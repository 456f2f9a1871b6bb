use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::{debug, error};

use super::{CompositionService, compute};
use crate::errors::{LmsError, Result};
use crate::models::ApiResponse;
use crate::models::courses::entities::Enrollment;
use crate::models::courses::responses::EnrollmentScoreResponse;
use crate::storage::Storage;

/// 从作答记录与手动评分重新计算选课成绩，三个字段一起写入
///
/// 选课记录缺失属于数据不一致，不会被当作 0 分处理。
pub async fn recompute_enrollment(
    storage: &Arc<dyn Storage>,
    student_id: i64,
    course_id: i64,
) -> Result<Enrollment> {
    let enrollment = load_enrollment(storage, student_id, course_id).await?;
    let manual = enrollment.manual_score;
    rebuild(storage, enrollment, manual).await
}

pub(super) async fn load_enrollment(
    storage: &Arc<dyn Storage>,
    student_id: i64,
    course_id: i64,
) -> Result<Enrollment> {
    storage
        .get_enrollment(student_id, course_id)
        .await?
        .ok_or_else(|| {
            LmsError::consistency(format!(
                "学生 {student_id} 未选修课程 {course_id}，无法计算成绩"
            ))
        })
}

pub(super) async fn rebuild(
    storage: &Arc<dyn Storage>,
    enrollment: Enrollment,
    manual: f64,
) -> Result<Enrollment> {
    let quiz_percentages = storage
        .list_closed_attempt_scores(enrollment.student_id, enrollment.course_id)
        .await?;

    let scores = compute::compose(&quiz_percentages, manual);

    debug!(
        "Recomputed enrollment {}: quiz={} manual={} final={} from {} attempts",
        enrollment.id,
        scores.quiz_score,
        scores.manual_score,
        scores.final_score,
        quiz_percentages.len()
    );

    storage.update_enrollment_scores(enrollment.id, scores).await
}

/// POST /courses/{id}/students/{student_id}/recompute
pub async fn handle_recompute(
    service: &CompositionService,
    request: &HttpRequest,
    course_id: i64,
    student_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match recompute_enrollment(&storage, student_id, course_id).await {
        Ok(enrollment) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            EnrollmentScoreResponse::from(enrollment),
            "成绩已重新计算",
        ))),
        Err(e) => {
            error!("Recompute failed for student {student_id} in course {course_id}: {e}");
            Ok(e.to_http_response())
        }
    }
}
