use serde::Deserialize;
use ts_rs::TS;

// 创建提交请求
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "submission.ts")]
pub struct CreateSubmissionRequest {
    pub file_ref: Option<String>,
    pub body: Option<String>,
}

// 评分请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "submission.ts")]
pub struct GradeSubmissionRequest {
    pub grade: f64,
    pub feedback: Option<String>,
}
