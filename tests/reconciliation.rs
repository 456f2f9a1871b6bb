//! 成绩表与考勤表的导入导出

mod common;

use std::sync::Arc;

use common::enrolled_student;
use rust_lms_grading::config::ImportConfig;
use rust_lms_grading::models::attendance::entities::AttendanceStatus;
use rust_lms_grading::services::{composition, reconciliation};
use rust_lms_grading::storage::Storage;

const GRADE_HEADER: &str =
    "Student ID,Name,Email,Quiz Score (40%),Manual Score (60%),Final Score (100%)";
const ATTENDANCE_HEADER: &str =
    "Student Name,Date (YYYY-MM-DD),Status (present/absent/late/excused),Course Name";

async fn manual_and_final(
    storage: &Arc<dyn Storage>,
    student_id: i64,
    course_id: i64,
) -> (f64, f64) {
    let enrollment = storage
        .get_enrollment(student_id, course_id)
        .await
        .unwrap()
        .unwrap();
    (enrollment.manual_score, enrollment.final_score)
}

#[tokio::test]
async fn grade_export_has_header_and_two_decimal_rows() {
    let storage = common::storage().await;
    let teacher = common::teacher(&storage).await;
    let course = common::course(&storage, "Algebra I", teacher.id).await;
    let john = enrolled_student(&storage, course.id, "jdoe", "John Doe").await;
    let mary = enrolled_student(&storage, course.id, "mmajor", "Major, Mary").await;
    composition::set_manual_score(&storage, john.id, course.id, 45.5)
        .await
        .unwrap();

    let data = reconciliation::export_grades(&storage, course.id)
        .await
        .unwrap();
    let text = String::from_utf8(data).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], GRADE_HEADER);
    assert_eq!(
        lines[1],
        format!("{},John Doe,jdoe@example.edu,0.00,45.50,45.50", john.id)
    );
    assert_eq!(
        lines[2],
        format!("{},\"Major, Mary\",mmajor@example.edu,0.00,0.00,0.00", mary.id)
    );
}

#[tokio::test]
async fn grade_import_isolates_unknown_and_invalid_rows() {
    let storage = common::storage().await;
    let teacher = common::teacher(&storage).await;
    let course = common::course(&storage, "Algebra I", teacher.id).await;
    let john = enrolled_student(&storage, course.id, "jdoe", "John Doe").await;
    let mary = enrolled_student(&storage, course.id, "mmajor", "Mary Major").await;
    let li = enrolled_student(&storage, course.id, "lwei", "Li Wei").await;
    composition::set_manual_score(&storage, mary.id, course.id, 30.0)
        .await
        .unwrap();
    composition::set_manual_score(&storage, li.id, course.id, 20.0)
        .await
        .unwrap();

    let csv = format!(
        "{GRADE_HEADER}\n\
         1, john doe ,x@example.edu,99,45,99,extra\n\
         2,Jane Smith,jane@example.edu,0,50,0\n\
         3,Mary Major,mm@example.edu,0,,0\n\
         4,Li Wei,lw@example.edu,0,abc,0\n\
         5,Mary Major,mm@example.edu,0,75,0\n"
    );

    let report = reconciliation::import_grades(
        &storage,
        course.id,
        csv.as_bytes(),
        &ImportConfig::default(),
    )
    .await
    .unwrap();

    assert_eq!(report.success_count, 3);
    assert_eq!(report.fail_count, 2);
    assert_eq!(report.reasons[0].row, 2);
    assert_eq!(report.reasons[0].subject, "Jane Smith");
    assert_eq!(report.reasons[1].row, 4);

    // 测验与总分列被忽略，总分由系统重新计算
    assert_eq!(
        manual_and_final(&storage, john.id, course.id).await,
        (45.0, 45.0)
    );

    // 空单元格保留原值，之后的 75 截断为 60
    assert_eq!(manual_and_final(&storage, mary.id, course.id).await.0, 60.0);

    // 非数字的行不影响原值
    assert_eq!(manual_and_final(&storage, li.id, course.id).await.0, 20.0);
}

#[tokio::test]
async fn grade_import_keeps_going_past_a_badly_encoded_row() {
    let storage = common::storage().await;
    let teacher = common::teacher(&storage).await;
    let course = common::course(&storage, "Algebra I", teacher.id).await;
    let john = enrolled_student(&storage, course.id, "jdoe", "John Doe").await;
    let mary = enrolled_student(&storage, course.id, "mmajor", "Mary Major").await;

    let mut csv = format!("{GRADE_HEADER}\n1,John Doe,,0,50,0\n").into_bytes();
    csv.extend_from_slice(b"2,Jos\xE9,,0,30,0\n");
    csv.extend_from_slice(b"3,Mary Major,,0,40,0\n");

    let report = reconciliation::import_grades(
        &storage,
        course.id,
        &csv,
        &ImportConfig::default(),
    )
    .await
    .unwrap();

    assert_eq!(report.success_count, 2);
    assert_eq!(report.fail_count, 1);
    assert_eq!(report.reasons[0].row, 2);
    assert!(report.reasons[0].reason.contains("UTF-8"));
    assert_eq!(manual_and_final(&storage, john.id, course.id).await, (50.0, 50.0));
    assert_eq!(manual_and_final(&storage, mary.id, course.id).await, (40.0, 40.0));
}

#[tokio::test]
async fn grade_import_rejects_ambiguous_names() {
    let storage = common::storage().await;
    let teacher = common::teacher(&storage).await;
    let course = common::course(&storage, "Algebra I", teacher.id).await;
    enrolled_student(&storage, course.id, "jdoe1", "John Doe").await;
    enrolled_student(&storage, course.id, "jdoe2", "John Doe").await;

    let csv = format!("{GRADE_HEADER}\n1,John Doe,,0,40,0\n");
    let report = reconciliation::import_grades(
        &storage,
        course.id,
        csv.as_bytes(),
        &ImportConfig::default(),
    )
    .await
    .unwrap();

    assert_eq!(report.success_count, 0);
    assert_eq!(report.fail_count, 1);
}

#[tokio::test]
async fn grade_import_structural_failures() {
    let storage = common::storage().await;
    let teacher = common::teacher(&storage).await;
    let course = common::course(&storage, "Algebra I", teacher.id).await;
    enrolled_student(&storage, course.id, "jdoe", "John Doe").await;
    let limits = ImportConfig {
        max_rows: 2,
        ..ImportConfig::default()
    };

    let cases: [&[u8]; 3] = [
        b"",
        b"Student ID,Name,Email\n1,John Doe,x\n",
        b"a,b,c,d,e\n1,John Doe,,,1\n2,John Doe,,,2\n3,John Doe,,,3\n",
    ];
    for data in cases {
        let err = reconciliation::import_grades(&storage, course.id, data, &limits)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E015");
    }

    let err = reconciliation::import_grades(&storage, 9999, b"x", &limits)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E006");
}

#[tokio::test]
async fn attendance_import_skips_unknown_student_and_keeps_going() {
    let storage = common::storage().await;
    let teacher = common::teacher(&storage).await;
    let course = common::course(&storage, "Algebra I", teacher.id).await;
    let john = enrolled_student(&storage, course.id, "jdoe", "John Doe").await;
    let mary = enrolled_student(&storage, course.id, "mmajor", "Mary Major").await;

    let csv = format!(
        "{ATTENDANCE_HEADER}\n\
         John Doe,2024-09-02,present,Algebra I\n\
         Jane Smith,2024-09-02,absent,Algebra I\n\
         Mary Major,2024-09-02,LATE,Geometry\n\
         John Doe,09/03/2024,absent,Algebra I\n\
         Mary Major,2024-09-03,tardy,Algebra I\n"
    );

    let report = reconciliation::import_attendance(
        &storage,
        course.id,
        Some(teacher.id),
        csv.as_bytes(),
        &ImportConfig::default(),
    )
    .await
    .unwrap();

    assert_eq!(report.success_count, 3);
    assert_eq!(report.fail_count, 2);
    assert_eq!(report.reasons[0].row, 2);
    assert_eq!(report.reasons[0].subject, "Jane Smith");
    assert_eq!(report.reasons[1].row, 4);

    let records = storage.list_course_attendance(course.id).await.unwrap();
    assert_eq!(records.len(), 3);
    let summary: Vec<(i64, String, AttendanceStatus)> = records
        .iter()
        .map(|r| (r.student_id, r.attended_on.to_string(), r.status))
        .collect();
    assert!(summary.contains(&(john.id, "2024-09-02".to_string(), AttendanceStatus::Present)));
    assert!(summary.contains(&(mary.id, "2024-09-02".to_string(), AttendanceStatus::Late)));
    assert!(summary.contains(&(mary.id, "2024-09-03".to_string(), AttendanceStatus::Present)));
    assert!(records.iter().all(|r| r.recorded_by == Some(teacher.id)));
}

#[tokio::test]
async fn attendance_reimport_overwrites_the_same_day() {
    let storage = common::storage().await;
    let teacher = common::teacher(&storage).await;
    let course = common::course(&storage, "Algebra I", teacher.id).await;
    enrolled_student(&storage, course.id, "jdoe", "John Doe").await;

    for status in ["present", "absent"] {
        let csv = format!("{ATTENDANCE_HEADER}\nJohn Doe,2024-09-02,{status},Algebra I\n");
        reconciliation::import_attendance(
            &storage,
            course.id,
            None,
            csv.as_bytes(),
            &ImportConfig::default(),
        )
        .await
        .unwrap();
    }

    let records = storage.list_course_attendance(course.id).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, AttendanceStatus::Absent);

    let text = String::from_utf8(
        reconciliation::export_attendance(&storage, course.id)
            .await
            .unwrap(),
    )
    .unwrap();
    assert_eq!(
        text,
        format!("{ATTENDANCE_HEADER}\nJohn Doe,2024-09-02,absent,Algebra I\n")
    );
}
