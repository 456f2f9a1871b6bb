use serde::Deserialize;
use ts_rs::TS;

use super::entities::{AnswerValue, QuestionType};

// 添加题目请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "quiz.ts")]
pub struct CreateQuestionRequest {
    pub position: i32,
    pub prompt: String,
    pub question_type: QuestionType,
    pub correct_answer: AnswerValue,
    pub points: f64,
}

// 单题答案
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "quiz.ts")]
pub struct SubmittedAnswer {
    pub question_id: i64,
    pub answer: AnswerValue,
}

// 交卷请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "quiz.ts")]
pub struct SubmitAttemptRequest {
    pub answers: Vec<SubmittedAnswer>,
}
