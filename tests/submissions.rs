//! 提交生命周期：创建、评分、概览与作业删除保护

mod common;

use chrono::{Duration, Utc};
use common::enrolled_student;
use rust_lms_grading::models::assignments::entities::AssignmentKind;
use rust_lms_grading::models::notifications::entities::NotificationType;
use rust_lms_grading::models::notifications::requests::NotificationListQuery;
use rust_lms_grading::models::submissions::entities::{SubmissionState, SubmissionStatus};
use rust_lms_grading::models::submissions::requests::{
    CreateSubmissionRequest, GradeSubmissionRequest,
};
use rust_lms_grading::models::PaginationQuery;
use rust_lms_grading::services::{assignments, quizzes, submissions};

fn body(text: &str) -> CreateSubmissionRequest {
    CreateSubmissionRequest {
        file_ref: None,
        body: Some(text.to_string()),
    }
}

fn grade(value: f64) -> GradeSubmissionRequest {
    GradeSubmissionRequest {
        grade: value,
        feedback: Some("Nice work".to_string()),
    }
}

#[tokio::test]
async fn duplicate_submission_leaves_the_first_untouched() {
    let storage = common::storage().await;
    let teacher = common::teacher(&storage).await;
    let course = common::course(&storage, "Algebra I", teacher.id).await;
    let student = enrolled_student(&storage, course.id, "jdoe", "John Doe").await;
    let essay =
        common::assignment(&storage, &teacher, course.id, AssignmentKind::Manual, 10.0, None).await;

    let first = submissions::create_submission(&storage, student.id, essay.id, body("first draft"))
        .await
        .unwrap();
    assert_eq!(first.status, SubmissionStatus::Submitted);
    assert!(!first.is_late);

    let err = submissions::create_submission(&storage, student.id, essay.id, body("second draft"))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E011");

    let stored = storage
        .get_submission_by_student(essay.id, student.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.id, first.id);
    assert_eq!(stored.body.as_deref(), Some("first draft"));
}

#[tokio::test]
async fn submission_needs_content_enrollment_and_manual_kind() {
    let storage = common::storage().await;
    let teacher = common::teacher(&storage).await;
    let course = common::course(&storage, "Algebra I", teacher.id).await;
    let student = enrolled_student(&storage, course.id, "jdoe", "John Doe").await;
    let outsider = common::user(
        &storage,
        "outsider",
        "Out Sider",
        rust_lms_grading::models::users::entities::UserRole::Student,
    )
    .await;
    let essay =
        common::assignment(&storage, &teacher, course.id, AssignmentKind::Manual, 10.0, None).await;
    let quiz = common::assignment(&storage, &teacher, course.id, AssignmentKind::Quiz, 10.0, None).await;

    let err = submissions::create_submission(&storage, student.id, essay.id, body("   "))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E005");

    let err = submissions::create_submission(&storage, outsider.id, essay.id, body("hi"))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E010");

    let err = submissions::create_submission(&storage, student.id, quiz.id, body("hi"))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E005");
}

#[tokio::test]
async fn late_submission_is_tagged() {
    let storage = common::storage().await;
    let teacher = common::teacher(&storage).await;
    let course = common::course(&storage, "Algebra I", teacher.id).await;
    let student = enrolled_student(&storage, course.id, "jdoe", "John Doe").await;
    let overdue = common::assignment(
        &storage,
        &teacher,
        course.id,
        AssignmentKind::Manual,
        10.0,
        Some(Utc::now() - Duration::days(1)),
    )
    .await;

    let submission = submissions::create_submission(
        &storage,
        student.id,
        overdue.id,
        CreateSubmissionRequest {
            file_ref: Some("uploads/essay.pdf".to_string()),
            body: None,
        },
    )
    .await
    .unwrap();
    assert!(submission.is_late);
}

#[tokio::test]
async fn grade_above_points_is_rejected() {
    let storage = common::storage().await;
    let teacher = common::teacher(&storage).await;
    let course = common::course(&storage, "Algebra I", teacher.id).await;
    let student = enrolled_student(&storage, course.id, "jdoe", "John Doe").await;
    let essay =
        common::assignment(&storage, &teacher, course.id, AssignmentKind::Manual, 10.0, None).await;
    submissions::create_submission(&storage, student.id, essay.id, body("draft"))
        .await
        .unwrap();

    for bad in [10.5, -1.0, f64::INFINITY] {
        let err = submissions::grade_submission(&storage, &teacher, essay.id, student.id, grade(bad))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E005");
    }

    let stored = storage
        .get_submission_by_student(essay.id, student.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, SubmissionStatus::Submitted);
    assert_eq!(stored.grade, None);
}

#[tokio::test]
async fn grading_a_pending_submission_is_rejected() {
    let storage = common::storage().await;
    let teacher = common::teacher(&storage).await;
    let course = common::course(&storage, "Algebra I", teacher.id).await;
    let student = enrolled_student(&storage, course.id, "jdoe", "John Doe").await;
    let essay =
        common::assignment(&storage, &teacher, course.id, AssignmentKind::Manual, 10.0, None).await;

    let err = submissions::grade_submission(&storage, &teacher, essay.id, student.id, grade(5.0))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E013");
}

#[tokio::test]
async fn regrade_is_last_write_wins_and_notifies_student() {
    let storage = common::storage().await;
    let teacher = common::teacher(&storage).await;
    let course = common::course(&storage, "Algebra I", teacher.id).await;
    let student = enrolled_student(&storage, course.id, "jdoe", "John Doe").await;
    let essay =
        common::assignment(&storage, &teacher, course.id, AssignmentKind::Manual, 10.0, None).await;
    submissions::create_submission(&storage, student.id, essay.id, body("draft"))
        .await
        .unwrap();

    let graded = submissions::grade_submission(&storage, &teacher, essay.id, student.id, grade(7.0))
        .await
        .unwrap();
    assert_eq!(graded.status, SubmissionStatus::Graded);
    assert_eq!(graded.grade, Some(7.0));
    assert_eq!(graded.graded_by, Some(teacher.id));

    let regraded =
        submissions::grade_submission(&storage, &teacher, essay.id, student.id, grade(9.5))
            .await
            .unwrap();
    assert_eq!(regraded.id, graded.id);
    assert_eq!(regraded.status, SubmissionStatus::Graded);
    assert_eq!(regraded.grade, Some(9.5));

    let inbox = storage
        .list_notifications_with_pagination(
            student.id,
            NotificationListQuery {
                pagination: PaginationQuery::default(),
                unread_only: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(inbox.items.len(), 2);
    assert!(
        inbox
            .items
            .iter()
            .all(|n| n.notification_type == NotificationType::GradePosted
                && n.reference_id == Some(graded.id))
    );
}

#[tokio::test]
async fn overview_derives_pending_missing_and_graded() {
    let storage = common::storage().await;
    let teacher = common::teacher(&storage).await;
    let course = common::course(&storage, "Algebra I", teacher.id).await;
    let alice = enrolled_student(&storage, course.id, "alice", "Alice Liddell").await;
    let bob = enrolled_student(&storage, course.id, "bob", "Bob Builder").await;
    let open =
        common::assignment(&storage, &teacher, course.id, AssignmentKind::Manual, 10.0, None).await;
    let overdue = common::assignment(
        &storage,
        &teacher,
        course.id,
        AssignmentKind::Manual,
        10.0,
        Some(Utc::now() - Duration::hours(2)),
    )
    .await;

    submissions::create_submission(&storage, alice.id, open.id, body("done"))
        .await
        .unwrap();
    submissions::grade_submission(&storage, &teacher, open.id, alice.id, grade(8.0))
        .await
        .unwrap();

    let overview = submissions::list_assignment_submissions(&storage, open.id)
        .await
        .unwrap();
    let state_of = |student_id: i64| {
        overview
            .items
            .iter()
            .find(|i| i.student_id == student_id)
            .map(|i| i.state)
    };
    assert_eq!(overview.items.len(), 2);
    assert_eq!(state_of(alice.id), Some(SubmissionState::Graded));
    assert_eq!(state_of(bob.id), Some(SubmissionState::Pending));

    submissions::create_submission(&storage, alice.id, overdue.id, body("late"))
        .await
        .unwrap();
    let overview = submissions::list_assignment_submissions(&storage, overdue.id)
        .await
        .unwrap();
    let state_of = |student_id: i64| {
        overview
            .items
            .iter()
            .find(|i| i.student_id == student_id)
            .map(|i| i.state)
    };
    assert_eq!(state_of(alice.id), Some(SubmissionState::Late));
    assert_eq!(state_of(bob.id), Some(SubmissionState::Missing));
}

#[tokio::test]
async fn assignment_with_dependents_cannot_be_deleted() {
    let storage = common::storage().await;
    let teacher = common::teacher(&storage).await;
    let course = common::course(&storage, "Algebra I", teacher.id).await;
    let student = enrolled_student(&storage, course.id, "jdoe", "John Doe").await;
    let essay =
        common::assignment(&storage, &teacher, course.id, AssignmentKind::Manual, 10.0, None).await;
    let quiz = common::assignment(&storage, &teacher, course.id, AssignmentKind::Quiz, 10.0, None).await;
    let unused =
        common::assignment(&storage, &teacher, course.id, AssignmentKind::Manual, 5.0, None).await;

    submissions::create_submission(&storage, student.id, essay.id, body("draft"))
        .await
        .unwrap();
    quizzes::start_attempt(&storage, student.id, quiz.id)
        .await
        .unwrap();

    for guarded in [essay.id, quiz.id] {
        let err = assignments::delete_assignment(&storage, guarded)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E013");
        assert!(storage.get_assignment_by_id(guarded).await.unwrap().is_some());
    }

    assignments::delete_assignment(&storage, unused.id)
        .await
        .unwrap();
    assert!(storage.get_assignment_by_id(unused.id).await.unwrap().is_none());

    let err = assignments::delete_assignment(&storage, unused.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E006");
}
