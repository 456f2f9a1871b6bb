use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::users::entities::User;

/// 测验部分满分
pub const QUIZ_WEIGHT: f64 = 40.0;
/// 手动评分部分满分
pub const MANUAL_WEIGHT: f64 = 60.0;
/// 课程总分满分
pub const FINAL_MAX: f64 = 100.0;
/// 课程通过线（仅用于展示）
pub const COURSE_PASS_THRESHOLD: f64 = 40.0;

// 课程实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "course.ts")]
pub struct Course {
    pub id: i64,
    pub name: String,
    pub teacher_id: i64,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 课程成绩的三个组成部分，总是一起写入
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "course.ts")]
pub struct ScoreBreakdown {
    pub quiz_score: f64,
    pub manual_score: f64,
    pub final_score: f64,
}

impl ScoreBreakdown {
    pub fn passed(&self) -> bool {
        self.final_score >= COURSE_PASS_THRESHOLD
    }
}

// 选课记录（分数字段是成绩合成服务写入的缓存）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "course.ts")]
pub struct Enrollment {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub quiz_score: f64,
    pub manual_score: f64,
    pub final_score: f64,
    pub enrolled_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Enrollment {
    pub fn scores(&self) -> ScoreBreakdown {
        ScoreBreakdown {
            quiz_score: self.quiz_score,
            manual_score: self.manual_score,
            final_score: self.final_score,
        }
    }
}

/// 花名册条目：选课记录与学生信息
#[derive(Debug, Clone)]
pub struct RosterEntry {
    pub enrollment: Enrollment,
    pub student: User,
}
