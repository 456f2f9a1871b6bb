use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use super::csv_io::{ATTENDANCE_HEADERS, DATE_FORMAT, normalize_name, read_table, write_table};
use super::grades::{index_roster_by_name, resolve_student};
use crate::config::ImportConfig;
use crate::errors::{LmsError, Result};
use crate::models::attendance::entities::{AttendanceStatus, AttendanceUpsert};
use crate::models::courses::entities::Course;
use crate::models::reconciliation::responses::ImportReport;
use crate::storage::Storage;

async fn load_course(storage: &Arc<dyn Storage>, course_id: i64) -> Result<Course> {
    storage
        .get_course_by_id(course_id)
        .await?
        .ok_or_else(|| LmsError::not_found(format!("课程 {course_id} 不存在")))
}

/// 导入考勤表
///
/// 状态无法识别时按出勤处理；课程名与所选课程不一致只记录警告，仍导入到所选课程。
pub async fn import_attendance(
    storage: &Arc<dyn Storage>,
    course_id: i64,
    recorded_by: Option<i64>,
    data: &[u8],
    limits: &ImportConfig,
) -> Result<ImportReport> {
    let course = load_course(storage, course_id).await?;
    let table = read_table(data, ATTENDANCE_HEADERS.len(), limits.max_rows)?;
    let roster = storage.list_course_roster(course_id).await?;
    let index = index_roster_by_name(&roster);
    let course_key = normalize_name(&course.name);

    let mut report = ImportReport::default();
    for record in &table.rows {
        let row = record.number;
        let name = record.cell(0);

        if let Some(reason) = &record.error {
            warn!("Attendance import row {row} skipped: {reason}");
            report.fail(row, name, reason.as_str());
            continue;
        }

        let student_id = match resolve_student(&index, name) {
            Ok(id) => id,
            Err(reason) => {
                warn!("Attendance import row {row} ('{name}') skipped: {reason}");
                report.fail(row, name, reason);
                continue;
            }
        };

        let attended_on = match NaiveDate::parse_from_str(record.cell(1), DATE_FORMAT) {
            Ok(date) => date,
            Err(_) => {
                let reason = format!("日期格式无效: '{}'，应为 YYYY-MM-DD", record.cell(1));
                warn!("Attendance import row {row} ('{name}') skipped: {reason}");
                report.fail(row, name, reason);
                continue;
            }
        };

        let status = AttendanceStatus::parse_lenient(record.cell(2));

        let course_name = record.cell(3);
        if !course_name.is_empty() && normalize_name(course_name) != course_key {
            warn!(
                "Attendance import row {row}: course '{}' does not match '{}', importing into course {}",
                course_name, course.name, course_id
            );
        }

        let upsert = AttendanceUpsert {
            course_id,
            student_id,
            attended_on,
            status,
            recorded_by,
        };
        match storage.upsert_attendance(upsert).await {
            Ok(_) => report.succeed(),
            Err(e) => {
                warn!("Attendance import row {row} ('{name}') failed: {e}");
                report.fail(row, name, e.message());
            }
        }
    }

    info!(
        "Attendance import for course {}: {} rows, {} succeeded, {} failed",
        course_id,
        report.total(),
        report.success_count,
        report.fail_count
    );
    Ok(report)
}

/// 导出课程考勤表（按日期、学生排序）
pub async fn export_attendance(storage: &Arc<dyn Storage>, course_id: i64) -> Result<Vec<u8>> {
    let course = load_course(storage, course_id).await?;
    let records = storage.list_course_attendance(course_id).await?;

    let mut names: HashMap<i64, String> = storage
        .list_course_roster(course_id)
        .await?
        .into_iter()
        .map(|entry| (entry.student.id, entry.student.full_name().to_string()))
        .collect();

    let mut rows = Vec::with_capacity(records.len());
    for record in records {
        // 退课学生的历史考勤仍然导出
        if !names.contains_key(&record.student_id) {
            let name = match storage.get_user_by_id(record.student_id).await? {
                Some(user) => user.full_name().to_string(),
                None => format!("#{}", record.student_id),
            };
            names.insert(record.student_id, name);
        }
        rows.push(vec![
            names[&record.student_id].clone(),
            record.attended_on.format(DATE_FORMAT).to_string(),
            record.status.to_string(),
            course.name.clone(),
        ]);
    }

    write_table(&ATTENDANCE_HEADERS, rows)
}

/// 考勤导入模板（含示例行）
pub fn attendance_template() -> Result<Vec<u8>> {
    let samples = [
        ["John Doe", "2024-09-02", "present", "Algebra I"],
        ["Mary Major", "2024-09-02", "late", "Algebra I"],
        ["John Doe", "2024-09-03", "absent", "Algebra I"],
    ];
    write_table(
        &ATTENDANCE_HEADERS,
        samples
            .iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect::<Vec<String>>()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_has_header_and_samples() {
        let text = String::from_utf8(attendance_template().unwrap()).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some(
                "Student Name,Date (YYYY-MM-DD),Status (present/absent/late/excused),Course Name"
            )
        );
        assert_eq!(lines.count(), 3);
    }

    #[test]
    fn test_template_reads_back() {
        let data = attendance_template().unwrap();
        let table = read_table(&data, ATTENDANCE_HEADERS.len(), 10).unwrap();
        assert_eq!(table.rows.len(), 3);
        assert!(NaiveDate::parse_from_str(table.rows[0].cell(1), DATE_FORMAT).is_ok());
    }
}
