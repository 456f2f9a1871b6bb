use serde::Serialize;
use ts_rs::TS;

use super::entities::Enrollment;

// 学生课程成绩响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "course.ts")]
pub struct EnrollmentScoreResponse {
    pub student_id: i64,
    pub course_id: i64,
    pub quiz_score: f64,
    pub manual_score: f64,
    pub final_score: f64,
    pub passed: bool,
}

impl From<Enrollment> for EnrollmentScoreResponse {
    fn from(enrollment: Enrollment) -> Self {
        let passed = enrollment.scores().passed();
        Self {
            student_id: enrollment.student_id,
            course_id: enrollment.course_id,
            quiz_score: enrollment.quiz_score,
            manual_score: enrollment.manual_score,
            final_score: enrollment.final_score,
            passed,
        }
    }
}
