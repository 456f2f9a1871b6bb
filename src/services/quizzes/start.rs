use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::info;

use super::QuizService;
use crate::errors::{LmsError, Result};
use crate::models::ApiResponse;
use crate::models::assignments::entities::AssignmentKind;
use crate::models::quizzes::entities::QuizAttempt;
use crate::storage::Storage;

/// 开始作答：只允许测验类作业，学生必须选修该课程，每人只能作答一次
pub async fn start_attempt(
    storage: &Arc<dyn Storage>,
    student_id: i64,
    assignment_id: i64,
) -> Result<QuizAttempt> {
    let assignment = storage
        .get_assignment_by_id(assignment_id)
        .await?
        .ok_or_else(|| LmsError::not_found(format!("作业 {assignment_id} 不存在")))?;

    if assignment.kind != AssignmentKind::Quiz {
        return Err(LmsError::validation("该作业不是测验"));
    }

    if storage
        .get_enrollment(student_id, assignment.course_id)
        .await?
        .is_none()
    {
        return Err(LmsError::authorization("未选修该课程，不能参加测验"));
    }

    if storage
        .get_quiz_attempt_by_student(assignment_id, student_id)
        .await?
        .is_some()
    {
        return Err(LmsError::duplicate_attempt("该测验已有作答记录"));
    }

    let attempt = storage.create_quiz_attempt(assignment_id, student_id).await?;
    info!(
        "Student {} started quiz attempt {} on assignment {}",
        student_id, attempt.id, assignment_id
    );
    Ok(attempt)
}

pub async fn handle_start_attempt(
    service: &QuizService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = match crate::services::current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(e.to_http_response()),
    };

    match start_attempt(&storage, user.id, assignment_id).await {
        Ok(attempt) => Ok(HttpResponse::Created().json(ApiResponse::success(attempt, "测验已开始"))),
        Err(e) => Ok(e.to_http_response()),
    }
}
