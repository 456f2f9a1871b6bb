use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::info;

use super::{SubmissionService, lifecycle};
use crate::errors::{LmsError, Result};
use crate::models::ApiResponse;
use crate::models::assignments::entities::AssignmentKind;
use crate::models::submissions::{
    entities::{NewSubmission, Submission},
    requests::CreateSubmissionRequest,
};
use crate::storage::Storage;

/// 创建提交；截止后提交标记为迟交，重复提交不会改动已有记录
pub async fn create_submission(
    storage: &Arc<dyn Storage>,
    student_id: i64,
    assignment_id: i64,
    req: CreateSubmissionRequest,
) -> Result<Submission> {
    let assignment = storage
        .get_assignment_by_id(assignment_id)
        .await?
        .ok_or_else(|| LmsError::not_found(format!("作业 {assignment_id} 不存在")))?;

    if assignment.kind != AssignmentKind::Manual {
        return Err(LmsError::validation("测验类作业请通过测验作答提交"));
    }

    if storage
        .get_enrollment(student_id, assignment.course_id)
        .await?
        .is_none()
    {
        return Err(LmsError::authorization("未选修该课程，不能提交作业"));
    }

    let (file_ref, body) = lifecycle::normalize_content(req.file_ref, req.body)?;

    if storage
        .get_submission_by_student(assignment_id, student_id)
        .await?
        .is_some()
    {
        return Err(LmsError::duplicate_submission("该作业已提交，不能重复提交"));
    }

    let now = chrono::Utc::now();
    let is_late = assignment.is_past_due(now);

    let submission = storage
        .create_submission(NewSubmission {
            assignment_id,
            student_id,
            file_ref,
            body,
            is_late,
            submitted_at: now,
        })
        .await?;

    info!(
        "Student {} submitted assignment {} (late={})",
        student_id, assignment_id, is_late
    );
    Ok(submission)
}

pub async fn handle_create_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: i64,
    req: CreateSubmissionRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = match crate::services::current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(e.to_http_response()),
    };

    match create_submission(&storage, user.id, assignment_id, req).await {
        Ok(submission) => {
            Ok(HttpResponse::Created().json(ApiResponse::success(submission, "提交成功")))
        }
        Err(e) => Ok(e.to_http_response()),
    }
}
