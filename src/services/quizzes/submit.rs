use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use super::{QuizService, engine, refresh_course_score};
use crate::errors::{LmsError, Result};
use crate::models::ApiResponse;
use crate::models::quizzes::{
    entities::AnswerValue, requests::SubmitAttemptRequest, responses::QuizAttemptResponse,
};
use crate::storage::Storage;

/// 交卷并自动评分
///
/// 答案、分数与结束时间在一个事务中写入；写入失败时作答保持未结束，可以重试。
pub async fn submit_attempt(
    storage: &Arc<dyn Storage>,
    student_id: i64,
    attempt_id: i64,
    req: SubmitAttemptRequest,
) -> Result<QuizAttemptResponse> {
    let attempt = storage
        .get_quiz_attempt(attempt_id)
        .await?
        .ok_or_else(|| LmsError::not_found(format!("测验作答 {attempt_id} 不存在")))?;

    if attempt.student_id != student_id {
        return Err(LmsError::authorization("只能提交自己的作答"));
    }
    if attempt.is_closed() {
        return Err(LmsError::invalid_state("该作答已提交，不能重复提交"));
    }

    let questions = storage.list_quiz_questions(attempt.assignment_id).await?;

    // 同一题重复提交时以最后一次为准
    let answers: HashMap<i64, AnswerValue> = req
        .answers
        .into_iter()
        .map(|a| (a.question_id, a.answer))
        .collect();
    let ignored = answers
        .keys()
        .filter(|id| !questions.iter().any(|q| q.id == **id))
        .count();
    if ignored > 0 {
        warn!("Attempt {attempt_id}: ignoring {ignored} answers for questions outside the bank");
    }

    let graded = engine::grade_attempt(&questions, &answers);
    let closed = storage
        .close_quiz_attempt(attempt_id, graded, chrono::Utc::now())
        .await?;

    info!(
        "Quiz attempt {} closed with score {:?} (needs_review={})",
        closed.id, closed.score, closed.needs_review
    );

    refresh_course_score(storage, closed.assignment_id, closed.student_id).await;

    let answers = storage.list_quiz_answers(attempt_id).await?;
    Ok(QuizAttemptResponse::new(closed, answers))
}

pub async fn handle_submit_attempt(
    service: &QuizService,
    request: &HttpRequest,
    attempt_id: i64,
    req: SubmitAttemptRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = match crate::services::current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(e.to_http_response()),
    };

    match submit_attempt(&storage, user.id, attempt_id, req).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response, "提交成功"))),
        Err(e) => Ok(e.to_http_response()),
    }
}
