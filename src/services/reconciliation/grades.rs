use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use super::csv_io::{
    GRADE_HEADERS, GRADE_MANUAL_COLUMN, GRADE_NAME_COLUMN, format_score, normalize_name,
    read_table, write_table,
};
use crate::config::ImportConfig;
use crate::errors::{LmsError, Result};
use crate::models::courses::entities::RosterEntry;
use crate::models::reconciliation::responses::ImportReport;
use crate::services::composition;
use crate::storage::Storage;

/// 导出课程成绩表：每个选课学生一行
pub async fn export_grades(storage: &Arc<dyn Storage>, course_id: i64) -> Result<Vec<u8>> {
    if storage.get_course_by_id(course_id).await?.is_none() {
        return Err(LmsError::not_found(format!("课程 {course_id} 不存在")));
    }

    let roster = storage.list_course_roster(course_id).await?;
    let rows = roster.into_iter().map(|entry| {
        vec![
            entry.student.id.to_string(),
            entry.student.full_name().to_string(),
            entry.student.email.clone(),
            format_score(entry.enrollment.quiz_score),
            format_score(entry.enrollment.manual_score),
            format_score(entry.enrollment.final_score),
        ]
    });

    write_table(&GRADE_HEADERS, rows)
}

/// 姓名到学生ID的索引，同名学生保留全部ID以便识别歧义
pub(super) fn index_roster_by_name(roster: &[RosterEntry]) -> HashMap<String, Vec<i64>> {
    let mut index: HashMap<String, Vec<i64>> = HashMap::new();
    for entry in roster {
        index
            .entry(normalize_name(entry.student.full_name()))
            .or_default()
            .push(entry.student.id);
    }
    index
}

/// 按姓名在花名册中定位学生
pub(super) fn resolve_student(
    index: &HashMap<String, Vec<i64>>,
    name: &str,
) -> std::result::Result<i64, String> {
    if name.trim().is_empty() {
        return Err("姓名为空".to_string());
    }
    match index.get(&normalize_name(name)).map(Vec::as_slice) {
        Some([student_id]) => Ok(*student_id),
        Some(ids) if ids.len() > 1 => Err(format!("姓名对应 {} 名学生，无法确定", ids.len())),
        _ => Err("学生不在课程名单中".to_string()),
    }
}

/// 导入成绩表
///
/// 只有手动评分列会被写入；测验与总分列由系统计算，导入时忽略。
/// 手动评分为空表示保留原值。逐行失败写入报告，不中断其余行。
pub async fn import_grades(
    storage: &Arc<dyn Storage>,
    course_id: i64,
    data: &[u8],
    limits: &ImportConfig,
) -> Result<ImportReport> {
    if storage.get_course_by_id(course_id).await?.is_none() {
        return Err(LmsError::not_found(format!("课程 {course_id} 不存在")));
    }

    let table = read_table(data, GRADE_MANUAL_COLUMN + 1, limits.max_rows)?;
    let roster = storage.list_course_roster(course_id).await?;
    let index = index_roster_by_name(&roster);

    let mut report = ImportReport::default();
    for record in &table.rows {
        let row = record.number;
        let name = record.cell(GRADE_NAME_COLUMN);

        if let Some(reason) = &record.error {
            warn!("Grade import row {row} skipped: {reason}");
            report.fail(row, name, reason.as_str());
            continue;
        }

        let student_id = match resolve_student(&index, name) {
            Ok(id) => id,
            Err(reason) => {
                warn!("Grade import row {row} ('{name}') skipped: {reason}");
                report.fail(row, name, reason);
                continue;
            }
        };

        let manual_cell = record.cell(GRADE_MANUAL_COLUMN);
        if manual_cell.is_empty() {
            report.succeed();
            continue;
        }

        let value = match manual_cell.parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => {
                let reason = format!("手动评分不是有效数字: '{manual_cell}'");
                warn!("Grade import row {row} ('{name}') skipped: {reason}");
                report.fail(row, name, reason);
                continue;
            }
        };

        match composition::set_manual_score(storage, student_id, course_id, value).await {
            Ok(_) => report.succeed(),
            Err(e) => {
                warn!("Grade import row {row} ('{name}') failed: {e}");
                report.fail(row, name, e.message());
            }
        }
    }

    info!(
        "Grade import for course {}: {} rows, {} succeeded, {} failed",
        course_id,
        report.total(),
        report.success_count,
        report.fail_count
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(entries: &[(&str, i64)]) -> HashMap<String, Vec<i64>> {
        let mut index: HashMap<String, Vec<i64>> = HashMap::new();
        for (name, id) in entries {
            index.entry(normalize_name(name)).or_default().push(*id);
        }
        index
    }

    #[test]
    fn test_resolve_student_ignores_case_and_spacing() {
        let idx = index(&[("John Doe", 1), ("Mary Major", 2)]);
        assert_eq!(resolve_student(&idx, " john  DOE "), Ok(1));
    }

    #[test]
    fn test_resolve_student_unknown_and_ambiguous() {
        let idx = index(&[("John Doe", 1), ("John Doe", 3)]);
        assert!(resolve_student(&idx, "John Doe").unwrap_err().contains("2"));
        assert!(resolve_student(&idx, "Jane Smith").is_err());
        assert!(resolve_student(&idx, "   ").is_err());
    }
}
