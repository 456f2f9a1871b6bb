//! 考勤实体

use sea_orm::entity::prelude::*;

/// attended_on 列的日期格式
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "attendance")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_id: i64,
    pub student_id: i64,
    pub attended_on: String,
    pub status: String,
    pub recorded_by: Option<i64>,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id"
    )]
    Course,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::StudentId",
        to = "super::users::Column::Id"
    )]
    Student,
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_record(self) -> crate::errors::Result<crate::models::attendance::entities::AttendanceRecord> {
        use crate::models::attendance::entities::{AttendanceRecord, AttendanceStatus};

        Ok(AttendanceRecord {
            id: self.id,
            course_id: self.course_id,
            student_id: self.student_id,
            attended_on: chrono::NaiveDate::parse_from_str(&self.attended_on, DATE_FORMAT)?,
            status: AttendanceStatus::parse_lenient(&self.status),
            recorded_by: self.recorded_by,
            updated_at: super::from_unix(self.updated_at),
        })
    }
}
