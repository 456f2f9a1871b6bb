use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

define_string_enum! {
    /// 考勤状态
    #[ts(export, export_to = "attendance.ts")]
    pub enum AttendanceStatus("考勤状态") {
        Present => "present",
        Absent => "absent",
        Late => "late",
        Excused => "excused",
    }
}

impl AttendanceStatus {
    /// 宽松解析：忽略大小写与首尾空白，无法识别时视为出勤
    pub fn parse_lenient(raw: &str) -> Self {
        raw.trim()
            .to_lowercase()
            .parse()
            .unwrap_or(AttendanceStatus::Present)
    }
}

// 考勤记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct AttendanceRecord {
    pub id: i64,
    pub course_id: i64,
    pub student_id: i64,
    pub attended_on: NaiveDate,
    pub status: AttendanceStatus,
    pub recorded_by: Option<i64>,
    pub updated_at: DateTime<Utc>,
}

/// 考勤写入（按 课程+学生+日期 覆盖）
#[derive(Debug, Clone)]
pub struct AttendanceUpsert {
    pub course_id: i64,
    pub student_id: i64,
    pub attended_on: NaiveDate,
    pub status: AttendanceStatus,
    pub recorded_by: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lenient_status() {
        assert_eq!(AttendanceStatus::parse_lenient(" Late "), AttendanceStatus::Late);
        assert_eq!(AttendanceStatus::parse_lenient("EXCUSED"), AttendanceStatus::Excused);
        assert_eq!(AttendanceStatus::parse_lenient("tardy"), AttendanceStatus::Present);
        assert_eq!(AttendanceStatus::parse_lenient(""), AttendanceStatus::Present);
    }
}
