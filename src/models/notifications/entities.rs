use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::{LmsError, Result};

define_string_enum! {
    /// 通知类型
    #[ts(export, export_to = "notification.ts")]
    pub enum NotificationType("通知类型") {
        Announcement => "announcement",
        GradePosted => "grade_posted",
        AssignmentDue => "assignment_due",
        System => "system",
    }
}

define_string_enum! {
    /// 通知优先级
    #[ts(export, export_to = "notification.ts")]
    pub enum NotificationPriority("通知优先级") {
        Low => "low",
        Normal => "normal",
        High => "high",
        Urgent => "urgent",
    }
}

define_string_enum! {
    /// 受众选择器的类型
    #[ts(export, export_to = "notification.ts")]
    pub enum AudienceKind("受众类型") {
        All => "all",
        AllStudents => "all-students",
        AllTeachers => "all-teachers",
        Courses => "courses",
    }
}

/// 解析后的受众
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Audience {
    All,
    AllStudents,
    AllTeachers,
    Courses(Vec<i64>),
}

impl Audience {
    /// 由请求中的类型与课程列表构造；选择课程时列表不能为空
    pub fn from_selector(kind: AudienceKind, course_ids: &[i64]) -> Result<Self> {
        match kind {
            AudienceKind::All => Ok(Audience::All),
            AudienceKind::AllStudents => Ok(Audience::AllStudents),
            AudienceKind::AllTeachers => Ok(Audience::AllTeachers),
            AudienceKind::Courses => {
                if course_ids.is_empty() {
                    return Err(LmsError::validation("按课程发送时至少需要选择一门课程"));
                }
                Ok(Audience::Courses(course_ids.to_vec()))
            }
        }
    }

    /// 写入通知记录的受众标签
    pub fn tag(&self) -> String {
        match self {
            Audience::All => AudienceKind::All.to_string(),
            Audience::AllStudents => AudienceKind::AllStudents.to_string(),
            Audience::AllTeachers => AudienceKind::AllTeachers.to_string(),
            Audience::Courses(ids) => {
                let ids: Vec<String> = ids.iter().map(i64::to_string).collect();
                format!("courses:{}", ids.join(","))
            }
        }
    }
}

// 通知实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "notification.ts")]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub notification_type: NotificationType,
    pub priority: NotificationPriority,
    pub sender_id: Option<i64>,
    pub sender_role: Option<String>,
    pub audience_tag: String,
    pub title: String,
    pub content: String,
    pub reference_type: Option<String>,
    pub reference_id: Option<i64>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}
