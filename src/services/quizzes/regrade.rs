use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use super::{QuizService, engine, refresh_course_score};
use crate::errors::{LmsError, Result};
use crate::models::ApiResponse;
use crate::models::quizzes::{entities::AnswerValue, responses::QuizAttemptResponse};
use crate::storage::Storage;

/// 按当前题库重新评分已结束的作答，整套答案与分数一起替换
pub async fn regrade_attempt(
    storage: &Arc<dyn Storage>,
    attempt_id: i64,
) -> Result<QuizAttemptResponse> {
    let attempt = storage
        .get_quiz_attempt(attempt_id)
        .await?
        .ok_or_else(|| LmsError::not_found(format!("测验作答 {attempt_id} 不存在")))?;

    if !attempt.is_closed() {
        return Err(LmsError::invalid_state("作答尚未提交，无法重新评分"));
    }

    let questions = storage.list_quiz_questions(attempt.assignment_id).await?;
    let stored: HashMap<i64, AnswerValue> = storage
        .list_quiz_answers(attempt_id)
        .await?
        .into_iter()
        .map(|a| (a.question_id, a.answer))
        .collect();

    let graded = engine::grade_attempt(&questions, &stored);
    let previous = attempt.score;
    let updated = storage.replace_quiz_grading(attempt_id, graded).await?;

    info!(
        "Quiz attempt {} regraded: {:?} -> {:?}",
        attempt_id, previous, updated.score
    );

    refresh_course_score(storage, updated.assignment_id, updated.student_id).await;

    let answers = storage.list_quiz_answers(attempt_id).await?;
    Ok(QuizAttemptResponse::new(updated, answers))
}

pub async fn handle_regrade_attempt(
    service: &QuizService,
    request: &HttpRequest,
    attempt_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match regrade_attempt(&storage, attempt_id).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response, "重新评分完成"))),
        Err(e) => Ok(e.to_http_response()),
    }
}
