//! 课程与选课存储操作

use std::collections::HashMap;

use super::{SeaOrmStorage, is_unique_violation};
use crate::entity::courses::{ActiveModel as CourseActiveModel, Entity as Courses};
use crate::entity::enrollments::{
    ActiveModel as EnrollmentActiveModel, Column as EnrollmentColumn, Entity as Enrollments,
};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{LmsError, Result};
use crate::entity::enrollments::Relation as EnrollmentRelation;
use crate::models::courses::{
    entities::{Course, Enrollment, RosterEntry, ScoreBreakdown},
    requests::CreateCourseRequest,
};
use crate::models::users::entities::UserStatus;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Set,
};

impl SeaOrmStorage {
    /// 创建课程
    pub async fn create_course_impl(&self, req: CreateCourseRequest) -> Result<Course> {
        let now = chrono::Utc::now().timestamp();

        let model = CourseActiveModel {
            name: Set(req.name),
            teacher_id: Set(req.teacher_id),
            description: Set(req.description),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                LmsError::validation("课程名称已存在")
            } else {
                LmsError::database_operation(format!("创建课程失败: {e}"))
            }
        })?;

        Ok(result.into_course())
    }

    /// 通过 ID 获取课程
    pub async fn get_course_by_id_impl(&self, course_id: i64) -> Result<Option<Course>> {
        let result = Courses::find_by_id(course_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_course()))
    }

    /// 学生选课，成绩初始为 0
    pub async fn enroll_student_impl(&self, student_id: i64, course_id: i64) -> Result<Enrollment> {
        let now = chrono::Utc::now().timestamp();

        let model = EnrollmentActiveModel {
            student_id: Set(student_id),
            course_id: Set(course_id),
            quiz_score: Set(0.0),
            manual_score: Set(0.0),
            final_score: Set(0.0),
            enrolled_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                LmsError::validation("学生已选修该课程")
            } else {
                LmsError::database_operation(format!("选课失败: {e}"))
            }
        })?;

        Ok(result.into_enrollment())
    }

    /// 获取选课记录
    pub async fn get_enrollment_impl(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<Option<Enrollment>> {
        let result = Enrollments::find()
            .filter(EnrollmentColumn::StudentId.eq(student_id))
            .filter(EnrollmentColumn::CourseId.eq(course_id))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询选课记录失败: {e}")))?;

        Ok(result.map(|m| m.into_enrollment()))
    }

    /// 课程花名册
    pub async fn list_course_roster_impl(&self, course_id: i64) -> Result<Vec<RosterEntry>> {
        let enrollments = Enrollments::find()
            .filter(EnrollmentColumn::CourseId.eq(course_id))
            .order_by_asc(EnrollmentColumn::StudentId)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询花名册失败: {e}")))?;

        if enrollments.is_empty() {
            return Ok(Vec::new());
        }

        let student_ids: Vec<i64> = enrollments.iter().map(|e| e.student_id).collect();
        let mut students: HashMap<i64, _> = Users::find()
            .filter(UserColumn::Id.is_in(student_ids))
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询学生信息失败: {e}")))?
            .into_iter()
            .map(|m| (m.id, m.into_user()))
            .collect();

        let mut roster = Vec::with_capacity(enrollments.len());
        for enrollment in enrollments {
            // 外键保证学生存在；缺失时视为数据不一致
            let student = students.remove(&enrollment.student_id).ok_or_else(|| {
                LmsError::consistency(format!(
                    "选课记录 {} 引用的学生 {} 不存在",
                    enrollment.id, enrollment.student_id
                ))
            })?;
            roster.push(RosterEntry {
                enrollment: enrollment.into_enrollment(),
                student,
            });
        }

        Ok(roster)
    }

    /// 选了任一课程的活跃学生 ID
    pub async fn list_student_ids_in_courses_impl(&self, course_ids: &[i64]) -> Result<Vec<i64>> {
        if course_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = Enrollments::find()
            .join(JoinType::InnerJoin, EnrollmentRelation::Student.def())
            .filter(EnrollmentColumn::CourseId.is_in(course_ids.iter().copied()))
            .filter(UserColumn::Status.eq(UserStatus::Active.to_string()))
            .select_only()
            .column(EnrollmentColumn::StudentId)
            .distinct()
            .order_by_asc(EnrollmentColumn::StudentId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询课程学生失败: {e}")))?;

        Ok(ids)
    }

    /// 同时写入三个成绩字段
    pub async fn update_enrollment_scores_impl(
        &self,
        enrollment_id: i64,
        scores: ScoreBreakdown,
    ) -> Result<Enrollment> {
        let existing = Enrollments::find_by_id(enrollment_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询选课记录失败: {e}")))?
            .ok_or_else(|| LmsError::consistency(format!("选课记录 {enrollment_id} 不存在")))?;

        let mut model: EnrollmentActiveModel = existing.into();
        model.quiz_score = Set(scores.quiz_score);
        model.manual_score = Set(scores.manual_score);
        model.final_score = Set(scores.final_score);
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("更新成绩失败: {e}")))?;

        Ok(result.into_enrollment())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::models::users::{entities::UserRole, requests::CreateUserRequest};
    use sea_orm::sea_query::Expr;

    async fn student(storage: &SeaOrmStorage, username: &str) -> i64 {
        storage
            .create_user_impl(CreateUserRequest {
                username: username.to_string(),
                email: format!("{username}@example.edu"),
                display_name: None,
                role: UserRole::Student,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_course_audience_skips_inactive_students() {
        let storage = SeaOrmStorage::connect(&DatabaseConfig {
            url: ":memory:".to_string(),
            pool_size: 1,
            timeout: 5,
        })
        .await
        .unwrap();

        let active = student(&storage, "jdoe").await;
        let suspended = student(&storage, "mmajor").await;
        let course = storage
            .create_course_impl(CreateCourseRequest {
                name: "Algebra I".to_string(),
                teacher_id: active,
                description: None,
            })
            .await
            .unwrap();
        storage.enroll_student_impl(active, course.id).await.unwrap();
        storage.enroll_student_impl(suspended, course.id).await.unwrap();

        Users::update_many()
            .col_expr(UserColumn::Status, Expr::value(UserStatus::Suspended.to_string()))
            .filter(UserColumn::Id.eq(suspended))
            .exec(&storage.db)
            .await
            .unwrap();

        let ids = storage
            .list_student_ids_in_courses_impl(&[course.id])
            .await
            .unwrap();
        assert_eq!(ids, vec![active]);
    }
}
