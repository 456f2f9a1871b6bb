use serde::Serialize;
use ts_rs::TS;

use super::entities::{Submission, SubmissionState};

// 评分界面中的一行：每个选课学生一行
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "submission.ts")]
pub struct SubmissionOverviewItem {
    pub student_id: i64,
    pub student_name: String,
    pub state: SubmissionState,
    pub submission: Option<Submission>,
}

// 作业提交概览响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "submission.ts")]
pub struct SubmissionOverviewResponse {
    pub assignment_id: i64,
    pub items: Vec<SubmissionOverviewItem>,
}
