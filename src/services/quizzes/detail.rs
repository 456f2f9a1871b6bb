use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::QuizService;
use crate::errors::{LmsError, Result};
use crate::models::ApiResponse;
use crate::models::quizzes::responses::QuizAttemptResponse;
use crate::models::users::entities::User;
use crate::storage::Storage;

/// 作答详情；通过标记在读取时计算
pub async fn get_attempt(
    storage: &Arc<dyn Storage>,
    viewer: &User,
    attempt_id: i64,
) -> Result<QuizAttemptResponse> {
    let attempt = storage
        .get_quiz_attempt(attempt_id)
        .await?
        .ok_or_else(|| LmsError::not_found(format!("测验作答 {attempt_id} 不存在")))?;

    if attempt.student_id != viewer.id && !viewer.role.is_staff() {
        return Err(LmsError::authorization("没有查看该作答的权限"));
    }

    let answers = storage.list_quiz_answers(attempt_id).await?;
    Ok(QuizAttemptResponse::new(attempt, answers))
}

pub async fn handle_get_attempt(
    service: &QuizService,
    request: &HttpRequest,
    attempt_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = match crate::services::current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(e.to_http_response()),
    };

    match get_attempt(&storage, &user, attempt_id).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response, "查询成功"))),
        Err(e) => Ok(e.to_http_response()),
    }
}
