use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::{info, warn};

use super::{SubmissionService, lifecycle};
use crate::errors::{LmsError, Result};
use crate::models::ApiResponse;
use crate::models::submissions::{
    entities::{Submission, SubmissionGrade},
    requests::GradeSubmissionRequest,
};
use crate::models::users::entities::User;
use crate::services::{composition, notifications};
use crate::storage::Storage;

/// 评分（重复评分以最后一次为准）
///
/// 评分写入后刷新课程成绩并通知学生；这两步失败只记录日志，不回滚评分。
pub async fn grade_submission(
    storage: &Arc<dyn Storage>,
    grader: &User,
    assignment_id: i64,
    student_id: i64,
    req: GradeSubmissionRequest,
) -> Result<Submission> {
    let assignment = storage
        .get_assignment_by_id(assignment_id)
        .await?
        .ok_or_else(|| LmsError::not_found(format!("作业 {assignment_id} 不存在")))?;

    lifecycle::validate_grade(req.grade, assignment.points)?;

    let submission = lifecycle::ensure_gradable(
        storage
            .get_submission_by_student(assignment_id, student_id)
            .await?,
    )?;

    let feedback = req.feedback.filter(|f| !f.trim().is_empty());
    let graded = storage
        .record_submission_grade(
            submission.id,
            SubmissionGrade {
                grade: req.grade,
                feedback,
                graded_by: grader.id,
                graded_at: chrono::Utc::now(),
            },
        )
        .await?;

    info!(
        "Submission {} graded {} / {} by user {}",
        graded.id, req.grade, assignment.points, grader.id
    );

    if let Err(e) =
        composition::recompute_enrollment(storage, student_id, assignment.course_id).await
    {
        warn!("Course score refresh after grading submission {} failed: {e}", graded.id);
    }

    if let Err(e) = notifications::notify_grade_posted(storage, grader, &assignment, &graded).await
    {
        warn!("Grade notification for submission {} failed: {e}", graded.id);
    }

    Ok(graded)
}

pub async fn handle_grade_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: i64,
    student_id: i64,
    req: GradeSubmissionRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let grader = match crate::services::current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(e.to_http_response()),
    };

    match grade_submission(&storage, &grader, assignment_id, student_id, req).await {
        Ok(submission) => Ok(HttpResponse::Ok().json(ApiResponse::success(submission, "评分成功"))),
        Err(e) => Ok(e.to_http_response()),
    }
}
