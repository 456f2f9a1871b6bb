//! 测验单题作答实体

use sea_orm::entity::prelude::*;

use crate::models::quizzes::entities::AnswerValue;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "quiz_answers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub attempt_id: i64,
    pub question_id: i64,
    /// JSON 编码的 AnswerValue
    #[sea_orm(column_type = "Text")]
    pub answer: String,
    pub is_correct: bool,
    pub points_awarded: f64,
    pub needs_review: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::quiz_attempts::Entity",
        from = "Column::AttemptId",
        to = "super::quiz_attempts::Column::Id"
    )]
    Attempt,
    #[sea_orm(
        belongs_to = "super::quiz_questions::Entity",
        from = "Column::QuestionId",
        to = "super::quiz_questions::Column::Id"
    )]
    Question,
}

impl Related<super::quiz_attempts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attempt.def()
    }
}

impl Related<super::quiz_questions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Question.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// 非 JSON 的旧数据按纯文本处理
pub(crate) fn decode_answer(raw: String) -> AnswerValue {
    serde_json::from_str(&raw).unwrap_or(AnswerValue::Text(raw))
}

pub(crate) fn encode_answer(value: &AnswerValue) -> crate::errors::Result<String> {
    Ok(serde_json::to_string(value)?)
}

impl Model {
    pub fn into_answer(self) -> crate::models::quizzes::entities::QuizAnswer {
        crate::models::quizzes::entities::QuizAnswer {
            id: self.id,
            attempt_id: self.attempt_id,
            question_id: self.question_id,
            answer: decode_answer(self.answer),
            is_correct: self.is_correct,
            points_awarded: self.points_awarded,
            needs_review: self.needs_review,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_fallback() {
        assert_eq!(
            decode_answer("Paris".to_string()),
            AnswerValue::Text("Paris".into())
        );
        assert_eq!(
            decode_answer(r#"["a","b"]"#.to_string()),
            AnswerValue::Choices(vec!["a".into(), "b".into()])
        );
    }
}
