//! 测验存储操作
//!
//! 作答的分数只会和整套答案一起在同一事务中写入。

use super::{SeaOrmStorage, is_unique_violation};
use crate::entity::assignments::{Column as AssignmentColumn, Entity as Assignments};
use crate::entity::quiz_answers::{
    self, ActiveModel as AnswerActiveModel, Column as AnswerColumn, Entity as QuizAnswers,
};
use crate::entity::quiz_attempts::{
    ActiveModel as AttemptActiveModel, Column as AttemptColumn, Entity as QuizAttempts,
};
use crate::entity::quiz_questions::{
    ActiveModel as QuestionActiveModel, Column as QuestionColumn, Entity as QuizQuestions,
};
use crate::errors::{LmsError, Result};
use crate::models::assignments::entities::AssignmentKind;
use crate::models::quizzes::{
    entities::{GradedAttempt, QuizAnswer, QuizAttempt, QuizQuestion},
    requests::CreateQuestionRequest,
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 添加题目
    pub async fn add_quiz_question_impl(
        &self,
        assignment_id: i64,
        req: CreateQuestionRequest,
    ) -> Result<QuizQuestion> {
        // 分值必须是有限的非负数
        if !req.points.is_finite() || req.points < 0.0 {
            return Err(LmsError::validation(format!(
                "题目分值必须是非负数: {}",
                req.points
            )));
        }

        let model = QuestionActiveModel {
            assignment_id: Set(assignment_id),
            position: Set(req.position),
            prompt: Set(req.prompt),
            question_type: Set(req.question_type.to_string()),
            correct_answer: Set(quiz_answers::encode_answer(&req.correct_answer)?),
            points: Set(req.points),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("添加题目失败: {e}")))?;

        Ok(result.into_question())
    }

    /// 列出题目
    pub async fn list_quiz_questions_impl(&self, assignment_id: i64) -> Result<Vec<QuizQuestion>> {
        let questions = QuizQuestions::find()
            .filter(QuestionColumn::AssignmentId.eq(assignment_id))
            .order_by_asc(QuestionColumn::Position)
            .order_by_asc(QuestionColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询题目失败: {e}")))?;

        Ok(questions.into_iter().map(|m| m.into_question()).collect())
    }

    /// 开始作答
    pub async fn create_quiz_attempt_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<QuizAttempt> {
        let model = AttemptActiveModel {
            assignment_id: Set(assignment_id),
            student_id: Set(student_id),
            started_at: Set(Utc::now().timestamp()),
            ended_at: Set(None),
            score: Set(None),
            ungraded_basis: Set(false),
            needs_review: Set(false),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                LmsError::duplicate_attempt("该测验已有作答记录")
            } else {
                LmsError::database_operation(format!("创建测验作答失败: {e}"))
            }
        })?;

        Ok(result.into_attempt())
    }

    /// 通过 ID 获取作答
    pub async fn get_quiz_attempt_impl(&self, attempt_id: i64) -> Result<Option<QuizAttempt>> {
        let result = QuizAttempts::find_by_id(attempt_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询测验作答失败: {e}")))?;

        Ok(result.map(|m| m.into_attempt()))
    }

    /// 获取学生在某测验上的作答
    pub async fn get_quiz_attempt_by_student_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<QuizAttempt>> {
        let result = QuizAttempts::find()
            .filter(AttemptColumn::AssignmentId.eq(assignment_id))
            .filter(AttemptColumn::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询测验作答失败: {e}")))?;

        Ok(result.map(|m| m.into_attempt()))
    }

    /// 列出作答的全部答案
    pub async fn list_quiz_answers_impl(&self, attempt_id: i64) -> Result<Vec<QuizAnswer>> {
        let answers = QuizAnswers::find()
            .filter(AnswerColumn::AttemptId.eq(attempt_id))
            .order_by_asc(AnswerColumn::QuestionId)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作答答案失败: {e}")))?;

        Ok(answers.into_iter().map(|m| m.into_answer()).collect())
    }

    /// 交卷：答案、分数、结束时间在同一事务中写入，失败时作答保持未结束
    pub async fn close_quiz_attempt_impl(
        &self,
        attempt_id: i64,
        graded: GradedAttempt,
        ended_at: DateTime<Utc>,
    ) -> Result<QuizAttempt> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LmsError::database_operation(format!("开启事务失败: {e}")))?;

        let attempt = QuizAttempts::find_by_id(attempt_id)
            .one(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询测验作答失败: {e}")))?
            .ok_or_else(|| LmsError::not_found(format!("测验作答 {attempt_id} 不存在")))?;

        if attempt.ended_at.is_some() {
            return Err(LmsError::invalid_state("该作答已提交，不能重复提交"));
        }

        let updated =
            Self::write_graded_attempt(&txn, attempt_id, attempt.into(), &graded, Some(ended_at))
                .await?;

        txn.commit()
            .await
            .map_err(|e| LmsError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(updated)
    }

    /// 重新评分：替换全部答案与分数
    pub async fn replace_quiz_grading_impl(
        &self,
        attempt_id: i64,
        graded: GradedAttempt,
    ) -> Result<QuizAttempt> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LmsError::database_operation(format!("开启事务失败: {e}")))?;

        let attempt = QuizAttempts::find_by_id(attempt_id)
            .one(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询测验作答失败: {e}")))?
            .ok_or_else(|| LmsError::not_found(format!("测验作答 {attempt_id} 不存在")))?;

        if attempt.ended_at.is_none() {
            return Err(LmsError::invalid_state("作答尚未提交，无法重新评分"));
        }

        let updated =
            Self::write_graded_attempt(&txn, attempt_id, attempt.into(), &graded, None).await?;

        txn.commit()
            .await
            .map_err(|e| LmsError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(updated)
    }

    async fn write_graded_attempt(
        txn: &DatabaseTransaction,
        attempt_id: i64,
        mut attempt: AttemptActiveModel,
        graded: &GradedAttempt,
        ended_at: Option<DateTime<Utc>>,
    ) -> Result<QuizAttempt> {
        QuizAnswers::delete_many()
            .filter(AnswerColumn::AttemptId.eq(attempt_id))
            .exec(txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("清除旧答案失败: {e}")))?;

        if !graded.answers.is_empty() {
            let mut rows = Vec::with_capacity(graded.answers.len());
            for answer in &graded.answers {
                rows.push(AnswerActiveModel {
                    attempt_id: Set(attempt_id),
                    question_id: Set(answer.question_id),
                    answer: Set(quiz_answers::encode_answer(&answer.answer)?),
                    is_correct: Set(answer.is_correct),
                    points_awarded: Set(answer.points_awarded),
                    needs_review: Set(answer.needs_review),
                    ..Default::default()
                });
            }

            QuizAnswers::insert_many(rows)
                .exec(txn)
                .await
                .map_err(|e| LmsError::database_operation(format!("写入答案失败: {e}")))?;
        }

        attempt.score = Set(Some(graded.score));
        attempt.ungraded_basis = Set(graded.ungraded_basis);
        attempt.needs_review = Set(graded.needs_review);
        if let Some(ended_at) = ended_at {
            attempt.ended_at = Set(Some(ended_at.timestamp()));
        }

        let updated = attempt
            .update(txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("更新测验作答失败: {e}")))?;

        Ok(updated.into_attempt())
    }

    /// 学生在课程内已结束的测验分数，按作业 ID 排序保证结果确定
    pub async fn list_closed_attempt_scores_impl(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<Vec<f64>> {
        let quiz_ids: Vec<i64> = Assignments::find()
            .filter(AssignmentColumn::CourseId.eq(course_id))
            .filter(AssignmentColumn::Kind.eq(AssignmentKind::Quiz.to_string()))
            .select_only()
            .column(AssignmentColumn::Id)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询课程测验失败: {e}")))?;

        if quiz_ids.is_empty() {
            return Ok(Vec::new());
        }

        let scores: Vec<Option<f64>> = QuizAttempts::find()
            .filter(AttemptColumn::StudentId.eq(student_id))
            .filter(AttemptColumn::AssignmentId.is_in(quiz_ids))
            .filter(AttemptColumn::EndedAt.is_not_null())
            .select_only()
            .column(AttemptColumn::Score)
            .order_by_asc(AttemptColumn::AssignmentId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询测验分数失败: {e}")))?;

        Ok(scores.into_iter().flatten().collect())
    }
}
