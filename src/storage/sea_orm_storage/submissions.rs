//! 提交存储操作

use super::{SeaOrmStorage, is_unique_violation};
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::errors::{LmsError, Result};
use crate::models::submissions::entities::{
    NewSubmission, Submission, SubmissionGrade, SubmissionStatus,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建提交，唯一索引兜底并发重复提交
    pub async fn create_submission_impl(&self, req: NewSubmission) -> Result<Submission> {
        let model = ActiveModel {
            assignment_id: Set(req.assignment_id),
            student_id: Set(req.student_id),
            file_ref: Set(req.file_ref),
            body: Set(req.body),
            status: Set(SubmissionStatus::Submitted.to_string()),
            is_late: Set(req.is_late),
            grade: Set(None),
            feedback: Set(None),
            graded_by: Set(None),
            submitted_at: Set(req.submitted_at.timestamp()),
            graded_at: Set(None),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                LmsError::duplicate_submission("该作业已提交，不能重复提交")
            } else {
                LmsError::database_operation(format!("创建提交失败: {e}"))
            }
        })?;

        Ok(result.into_submission())
    }

    /// 获取学生对某作业的提交
    pub async fn get_submission_by_student_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 写入评分，状态推进到 graded（重复评分保持 graded）
    pub async fn record_submission_grade_impl(
        &self,
        submission_id: i64,
        grade: SubmissionGrade,
    ) -> Result<Submission> {
        let existing = Submissions::find_by_id(submission_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询提交失败: {e}")))?
            .ok_or_else(|| LmsError::not_found(format!("提交 {submission_id} 不存在")))?;

        let mut model: ActiveModel = existing.into();
        model.status = Set(SubmissionStatus::Graded.to_string());
        model.grade = Set(Some(grade.grade));
        model.feedback = Set(grade.feedback);
        model.graded_by = Set(Some(grade.graded_by));
        model.graded_at = Set(Some(grade.graded_at.timestamp()));

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("保存评分失败: {e}")))?;

        Ok(result.into_submission())
    }

    /// 列出作业的全部提交
    pub async fn list_assignment_submissions_impl(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<Submission>> {
        let submissions = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .order_by_asc(Column::StudentId)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询提交列表失败: {e}")))?;

        Ok(submissions
            .into_iter()
            .map(|m| m.into_submission())
            .collect())
    }
}
