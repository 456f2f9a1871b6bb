use serde::Deserialize;
use ts_rs::TS;

// 创建课程请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "course.ts")]
pub struct CreateCourseRequest {
    pub name: String,
    pub teacher_id: i64,
    pub description: Option<String>,
}

// 设置手动评分请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "course.ts")]
pub struct ManualScoreRequest {
    pub manual_score: f64,
}
