use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 测验通过线（百分制，仅用于展示）
pub const QUIZ_PASS_THRESHOLD: f64 = 70.0;

define_string_enum! {
    /// 题目类型
    #[ts(export, export_to = "quiz.ts")]
    pub enum QuestionType("题目类型") {
        MultipleChoice => "multiple_choice",
        TrueFalse => "true_false",
        ShortAnswer => "short_answer",
        MultiSelect => "multi_select",
        Numeric => "numeric",
        FreeText => "free_text",
    }
}

impl QuestionType {
    /// 是否可以自动评分
    pub fn is_auto_gradable(&self) -> bool {
        !matches!(self, QuestionType::FreeText)
    }
}

/// 答案值：单个文本或选项列表，以 JSON 文本持久化
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export, export_to = "quiz.ts")]
pub enum AnswerValue {
    Text(String),
    Choices(Vec<String>),
}

impl AnswerValue {
    /// 单值视图；选项列表只有一个元素时同样视为单值
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AnswerValue::Text(s) => Some(s),
            AnswerValue::Choices(items) if items.len() == 1 => Some(&items[0]),
            AnswerValue::Choices(_) => None,
        }
    }

    /// 列表视图；文本按逗号拆分
    pub fn items(&self) -> Vec<&str> {
        match self {
            AnswerValue::Text(s) => s.split(',').collect(),
            AnswerValue::Choices(items) => items.iter().map(String::as_str).collect(),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            AnswerValue::Text(s) => s.trim().is_empty(),
            AnswerValue::Choices(items) => items.iter().all(|i| i.trim().is_empty()),
        }
    }
}

impl Default for AnswerValue {
    fn default() -> Self {
        AnswerValue::Text(String::new())
    }
}

// 测验题目
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "quiz.ts")]
pub struct QuizQuestion {
    pub id: i64,
    pub assignment_id: i64,
    pub position: i32,
    pub prompt: String,
    pub question_type: QuestionType,
    pub correct_answer: AnswerValue,
    pub points: f64,
}

// 测验作答记录（每个学生每个测验只有一条）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "quiz.ts")]
pub struct QuizAttempt {
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub score: Option<f64>,
    pub ungraded_basis: bool,
    pub needs_review: bool,
}

impl QuizAttempt {
    pub fn is_closed(&self) -> bool {
        self.ended_at.is_some()
    }

    /// 读取时计算，不落库
    pub fn passed(&self) -> Option<bool> {
        self.score.map(|s| s >= QUIZ_PASS_THRESHOLD)
    }
}

// 单题作答
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "quiz.ts")]
pub struct QuizAnswer {
    pub id: i64,
    pub attempt_id: i64,
    pub question_id: i64,
    pub answer: AnswerValue,
    pub is_correct: bool,
    pub points_awarded: f64,
    pub needs_review: bool,
}

/// 单题评分结果（尚未落库）
#[derive(Debug, Clone, PartialEq)]
pub struct GradedAnswer {
    pub question_id: i64,
    pub answer: AnswerValue,
    pub is_correct: bool,
    pub points_awarded: f64,
    pub needs_review: bool,
}

/// 整份作答的评分结果
#[derive(Debug, Clone, PartialEq)]
pub struct GradedAttempt {
    pub answers: Vec<GradedAnswer>,
    pub score: f64,
    pub ungraded_basis: bool,
    pub needs_review: bool,
}
