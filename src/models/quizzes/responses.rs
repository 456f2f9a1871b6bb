use serde::Serialize;
use ts_rs::TS;

use super::entities::{QuizAnswer, QuizAttempt};

// 作答详情响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "quiz.ts")]
pub struct QuizAttemptResponse {
    pub attempt: QuizAttempt,
    pub answers: Vec<QuizAnswer>,
    pub passed: Option<bool>,
}

impl QuizAttemptResponse {
    pub fn new(attempt: QuizAttempt, answers: Vec<QuizAnswer>) -> Self {
        let passed = attempt.passed();
        Self {
            attempt,
            answers,
            passed,
        }
    }
}
