use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

define_string_enum! {
    /// 提交记录的持久化状态（只会前进）
    #[ts(export, export_to = "submission.ts")]
    pub enum SubmissionStatus("提交状态") {
        Submitted => "submitted",
        Graded => "graded",
    }
}

define_string_enum! {
    /// 展示给评分界面的派生状态
    #[ts(export, export_to = "submission.ts")]
    pub enum SubmissionState("提交展示状态") {
        Pending => "pending",
        Missing => "missing",
        Submitted => "submitted",
        Late => "late",
        Graded => "graded",
    }
}

// 提交记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "submission.ts")]
pub struct Submission {
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    pub file_ref: Option<String>,
    pub body: Option<String>,
    pub status: SubmissionStatus,
    pub is_late: bool,
    pub grade: Option<f64>,
    pub feedback: Option<String>,
    pub graded_by: Option<i64>,
    pub submitted_at: DateTime<Utc>,
    pub graded_at: Option<DateTime<Utc>>,
}

/// 新提交记录（写入前）
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub assignment_id: i64,
    pub student_id: i64,
    pub file_ref: Option<String>,
    pub body: Option<String>,
    pub is_late: bool,
    pub submitted_at: DateTime<Utc>,
}

/// 评分写入
#[derive(Debug, Clone)]
pub struct SubmissionGrade {
    pub grade: f64,
    pub feedback: Option<String>,
    pub graded_by: i64,
    pub graded_at: DateTime<Utc>,
}
