//! 考勤存储操作

use super::{SeaOrmStorage, is_unique_violation};
use crate::entity::attendance::{ActiveModel, Column, DATE_FORMAT, Entity as Attendance};
use crate::errors::{LmsError, Result};
use crate::models::attendance::entities::{AttendanceRecord, AttendanceUpsert};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 按 课程+学生+日期 写入或覆盖考勤
    pub async fn upsert_attendance_impl(&self, req: AttendanceUpsert) -> Result<AttendanceRecord> {
        let attended_on = req.attended_on.format(DATE_FORMAT).to_string();

        if let Some(record) = self.update_attendance_if_exists(&req, &attended_on).await? {
            return Ok(record);
        }

        let model = ActiveModel {
            course_id: Set(req.course_id),
            student_id: Set(req.student_id),
            attended_on: Set(attended_on.clone()),
            status: Set(req.status.to_string()),
            recorded_by: Set(req.recorded_by),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        match model.insert(&self.db).await {
            Ok(result) => result.into_record(),
            // 并发写入同一天：对方已插入，改为覆盖
            Err(e) if is_unique_violation(&e) => self
                .update_attendance_if_exists(&req, &attended_on)
                .await?
                .ok_or_else(|| LmsError::database_operation("写入考勤失败: 记录冲突")),
            Err(e) => Err(LmsError::database_operation(format!("写入考勤失败: {e}"))),
        }
    }

    async fn update_attendance_if_exists(
        &self,
        req: &AttendanceUpsert,
        attended_on: &str,
    ) -> Result<Option<AttendanceRecord>> {
        let existing = Attendance::find()
            .filter(Column::CourseId.eq(req.course_id))
            .filter(Column::StudentId.eq(req.student_id))
            .filter(Column::AttendedOn.eq(attended_on))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询考勤失败: {e}")))?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.status = Set(req.status.to_string());
        model.recorded_by = Set(req.recorded_by);
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("更新考勤失败: {e}")))?;

        result.into_record().map(Some)
    }

    /// 列出课程考勤
    pub async fn list_course_attendance_impl(
        &self,
        course_id: i64,
    ) -> Result<Vec<AttendanceRecord>> {
        let records = Attendance::find()
            .filter(Column::CourseId.eq(course_id))
            .order_by_asc(Column::AttendedOn)
            .order_by_asc(Column::StudentId)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询考勤失败: {e}")))?;

        records.into_iter().map(|m| m.into_record()).collect()
    }
}
