//! 测验题目实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "quiz_questions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub assignment_id: i64,
    pub position: i32,
    #[sea_orm(column_type = "Text")]
    pub prompt: String,
    pub question_type: String,
    /// JSON 编码的 AnswerValue
    #[sea_orm(column_type = "Text")]
    pub correct_answer: String,
    pub points: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assignments::Entity",
        from = "Column::AssignmentId",
        to = "super::assignments::Column::Id"
    )]
    Assignment,
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_question(self) -> crate::models::quizzes::entities::QuizQuestion {
        use crate::models::quizzes::entities::{QuestionType, QuizQuestion};

        QuizQuestion {
            id: self.id,
            assignment_id: self.assignment_id,
            position: self.position,
            prompt: self.prompt,
            // 无法识别的题型按主观题处理，交给人工复核
            question_type: self
                .question_type
                .parse::<QuestionType>()
                .unwrap_or(QuestionType::FreeText),
            correct_answer: super::quiz_answers::decode_answer(self.correct_answer),
            points: self.points,
        }
    }
}
