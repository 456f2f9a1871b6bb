use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

define_string_enum! {
    /// 作业类型
    #[ts(export, export_to = "assignment.ts")]
    pub enum AssignmentKind("作业类型") {
        Manual => "manual",
        Quiz => "quiz",
    }
}

// 作业实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "assignment.ts")]
pub struct Assignment {
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    pub kind: AssignmentKind,
    pub points: f64,
    pub due_date: Option<DateTime<Utc>>,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Assignment {
    /// 没有截止时间的作业永远不会逾期
    pub fn is_past_due(&self, at: DateTime<Utc>) -> bool {
        self.due_date.is_some_and(|due| at > due)
    }
}

/// 引用某个作业的记录数，删除前检查
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssignmentDependents {
    pub submissions: u64,
    pub quiz_attempts: u64,
}

impl AssignmentDependents {
    pub fn is_empty(&self) -> bool {
        self.submissions == 0 && self.quiz_attempts == 0
    }
}
