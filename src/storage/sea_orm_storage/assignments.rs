//! 作业存储操作

use super::SeaOrmStorage;
use crate::entity::assignments::{ActiveModel, Entity as Assignments};
use crate::entity::quiz_attempts::{Column as AttemptColumn, Entity as QuizAttempts};
use crate::entity::submissions::{Column as SubmissionColumn, Entity as Submissions};
use crate::errors::{LmsError, Result};
use crate::models::assignments::{
    entities::{Assignment, AssignmentDependents},
    requests::CreateAssignmentRequest,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};

impl SeaOrmStorage {
    /// 创建作业
    pub async fn create_assignment_impl(
        &self,
        created_by: i64,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            course_id: Set(req.course_id),
            title: Set(req.title),
            kind: Set(req.kind.to_string()),
            points: Set(req.points),
            due_date: Set(req.due_date.map(|d| d.timestamp())),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("创建作业失败: {e}")))?;

        Ok(result.into_assignment())
    }

    /// 通过 ID 获取作业
    pub async fn get_assignment_by_id_impl(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(assignment_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作业失败: {e}")))?;

        Ok(result.map(|m| m.into_assignment()))
    }

    /// 统计引用作业的记录
    pub async fn count_assignment_dependents_impl(
        &self,
        assignment_id: i64,
    ) -> Result<AssignmentDependents> {
        let submissions = Submissions::find()
            .filter(SubmissionColumn::AssignmentId.eq(assignment_id))
            .count(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("统计提交数量失败: {e}")))?;

        let quiz_attempts = QuizAttempts::find()
            .filter(AttemptColumn::AssignmentId.eq(assignment_id))
            .count(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("统计测验作答数量失败: {e}")))?;

        Ok(AssignmentDependents {
            submissions,
            quiz_attempts,
        })
    }

    /// 删除作业（题目随外键级联删除）
    pub async fn delete_assignment_impl(&self, assignment_id: i64) -> Result<bool> {
        let result = Assignments::delete_by_id(assignment_id)
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("删除作业失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
