//! 通知群发与收件箱

mod common;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::enrolled_student;
use rust_lms_grading::errors::{LmsError, Result};
use rust_lms_grading::models::PaginationQuery;
use rust_lms_grading::models::assignments::{
    entities::{Assignment, AssignmentDependents},
    requests::CreateAssignmentRequest,
};
use rust_lms_grading::models::attendance::entities::{AttendanceRecord, AttendanceUpsert};
use rust_lms_grading::models::courses::{
    entities::{Course, Enrollment, RosterEntry, ScoreBreakdown},
    requests::CreateCourseRequest,
};
use rust_lms_grading::models::notifications::{
    entities::{AudienceKind, Notification, NotificationPriority, NotificationType},
    requests::{CreateNotificationRequest, FanoutRequest, NotificationListQuery},
    responses::NotificationListResponse,
};
use rust_lms_grading::models::quizzes::{
    entities::{GradedAttempt, QuizAnswer, QuizAttempt, QuizQuestion},
    requests::CreateQuestionRequest,
};
use rust_lms_grading::models::submissions::entities::{NewSubmission, Submission, SubmissionGrade};
use rust_lms_grading::models::users::{
    entities::{User, UserRole},
    requests::CreateUserRequest,
};
use rust_lms_grading::services::notifications;
use rust_lms_grading::storage::Storage;

/// 对某个收件人写入通知时总是失败，其余操作原样转发
struct RejectingInbox {
    inner: Arc<dyn Storage>,
    rejected_user: i64,
}

#[async_trait::async_trait]
impl Storage for RejectingInbox {
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.inner.create_user(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.inner.get_user_by_id(id).await
    }

    async fn list_active_user_ids(&self, role: Option<UserRole>) -> Result<Vec<i64>> {
        self.inner.list_active_user_ids(role).await
    }

    async fn create_course(&self, course: CreateCourseRequest) -> Result<Course> {
        self.inner.create_course(course).await
    }

    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>> {
        self.inner.get_course_by_id(course_id).await
    }

    async fn enroll_student(&self, student_id: i64, course_id: i64) -> Result<Enrollment> {
        self.inner.enroll_student(student_id, course_id).await
    }

    async fn get_enrollment(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<Option<Enrollment>> {
        self.inner.get_enrollment(student_id, course_id).await
    }

    async fn list_course_roster(&self, course_id: i64) -> Result<Vec<RosterEntry>> {
        self.inner.list_course_roster(course_id).await
    }

    async fn list_student_ids_in_courses(&self, course_ids: &[i64]) -> Result<Vec<i64>> {
        self.inner.list_student_ids_in_courses(course_ids).await
    }

    async fn update_enrollment_scores(
        &self,
        enrollment_id: i64,
        scores: ScoreBreakdown,
    ) -> Result<Enrollment> {
        self.inner.update_enrollment_scores(enrollment_id, scores).await
    }

    async fn create_assignment(
        &self,
        created_by: i64,
        assignment: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        self.inner.create_assignment(created_by, assignment).await
    }

    async fn get_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        self.inner.get_assignment_by_id(assignment_id).await
    }

    async fn count_assignment_dependents(
        &self,
        assignment_id: i64,
    ) -> Result<AssignmentDependents> {
        self.inner.count_assignment_dependents(assignment_id).await
    }

    async fn delete_assignment(&self, assignment_id: i64) -> Result<bool> {
        self.inner.delete_assignment(assignment_id).await
    }

    async fn add_quiz_question(
        &self,
        assignment_id: i64,
        question: CreateQuestionRequest,
    ) -> Result<QuizQuestion> {
        self.inner.add_quiz_question(assignment_id, question).await
    }

    async fn list_quiz_questions(&self, assignment_id: i64) -> Result<Vec<QuizQuestion>> {
        self.inner.list_quiz_questions(assignment_id).await
    }

    async fn create_quiz_attempt(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<QuizAttempt> {
        self.inner.create_quiz_attempt(assignment_id, student_id).await
    }

    async fn get_quiz_attempt(&self, attempt_id: i64) -> Result<Option<QuizAttempt>> {
        self.inner.get_quiz_attempt(attempt_id).await
    }

    async fn get_quiz_attempt_by_student(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<QuizAttempt>> {
        self.inner
            .get_quiz_attempt_by_student(assignment_id, student_id)
            .await
    }

    async fn list_quiz_answers(&self, attempt_id: i64) -> Result<Vec<QuizAnswer>> {
        self.inner.list_quiz_answers(attempt_id).await
    }

    async fn close_quiz_attempt(
        &self,
        attempt_id: i64,
        graded: GradedAttempt,
        ended_at: DateTime<Utc>,
    ) -> Result<QuizAttempt> {
        self.inner.close_quiz_attempt(attempt_id, graded, ended_at).await
    }

    async fn replace_quiz_grading(
        &self,
        attempt_id: i64,
        graded: GradedAttempt,
    ) -> Result<QuizAttempt> {
        self.inner.replace_quiz_grading(attempt_id, graded).await
    }

    async fn list_closed_attempt_scores(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<Vec<f64>> {
        self.inner
            .list_closed_attempt_scores(student_id, course_id)
            .await
    }

    async fn create_submission(&self, submission: NewSubmission) -> Result<Submission> {
        self.inner.create_submission(submission).await
    }

    async fn get_submission_by_student(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        self.inner
            .get_submission_by_student(assignment_id, student_id)
            .await
    }

    async fn record_submission_grade(
        &self,
        submission_id: i64,
        grade: SubmissionGrade,
    ) -> Result<Submission> {
        self.inner.record_submission_grade(submission_id, grade).await
    }

    async fn list_assignment_submissions(&self, assignment_id: i64) -> Result<Vec<Submission>> {
        self.inner.list_assignment_submissions(assignment_id).await
    }

    async fn create_notification(&self, req: CreateNotificationRequest) -> Result<Notification> {
        if req.user_id == self.rejected_user {
            return Err(LmsError::database_operation("收件箱不可写"));
        }
        self.inner.create_notification(req).await
    }

    async fn list_notifications_with_pagination(
        &self,
        user_id: i64,
        query: NotificationListQuery,
    ) -> Result<NotificationListResponse> {
        self.inner
            .list_notifications_with_pagination(user_id, query)
            .await
    }

    async fn get_unread_notification_count(&self, user_id: i64) -> Result<i64> {
        self.inner.get_unread_notification_count(user_id).await
    }

    async fn mark_notification_as_read(&self, notification_id: i64, user_id: i64) -> Result<bool> {
        self.inner
            .mark_notification_as_read(notification_id, user_id)
            .await
    }

    async fn mark_all_notifications_as_read(&self, user_id: i64) -> Result<i64> {
        self.inner.mark_all_notifications_as_read(user_id).await
    }

    async fn upsert_attendance(&self, record: AttendanceUpsert) -> Result<AttendanceRecord> {
        self.inner.upsert_attendance(record).await
    }

    async fn list_course_attendance(&self, course_id: i64) -> Result<Vec<AttendanceRecord>> {
        self.inner.list_course_attendance(course_id).await
    }
}

fn announcement(audience: AudienceKind, course_ids: Vec<i64>) -> FanoutRequest {
    FanoutRequest {
        audience,
        course_ids,
        title: "Midterm moved".to_string(),
        message: "The midterm is now on Friday.".to_string(),
        notification_type: NotificationType::Announcement,
        priority: NotificationPriority::High,
    }
}

async fn inbox(
    storage: &Arc<dyn Storage>,
    user_id: i64,
    unread_only: Option<bool>,
) -> NotificationListResponse {
    storage
        .list_notifications_with_pagination(
            user_id,
            NotificationListQuery {
                pagination: PaginationQuery::default(),
                unread_only,
            },
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn course_fanout_reaches_each_student_once() {
    let storage = common::storage().await;
    let teacher = common::teacher(&storage).await;
    let algebra = common::course(&storage, "Algebra I", teacher.id).await;
    let geometry = common::course(&storage, "Geometry", teacher.id).await;
    let john = enrolled_student(&storage, algebra.id, "jdoe", "John Doe").await;
    storage.enroll_student(john.id, geometry.id).await.unwrap();
    let mary = enrolled_student(&storage, geometry.id, "mmajor", "Mary Major").await;
    let outsider = common::user(&storage, "lwei", "Li Wei", UserRole::Student).await;

    let report = notifications::fan_out(
        &storage,
        &teacher,
        announcement(AudienceKind::Courses, vec![algebra.id, geometry.id]),
    )
    .await
    .unwrap();

    assert_eq!(report.recipients, 2);
    assert_eq!(report.created, 2);
    assert_eq!(report.failed, 0);

    let johns = inbox(&storage, john.id, None).await;
    assert_eq!(johns.items.len(), 1);
    let note = &johns.items[0];
    assert_eq!(note.sender_id, Some(teacher.id));
    assert_eq!(note.sender_role.as_deref(), Some("teacher"));
    assert_eq!(
        note.audience_tag,
        format!("courses:{},{}", algebra.id, geometry.id)
    );
    assert_eq!(note.priority, NotificationPriority::High);
    assert!(!note.is_read);

    assert_eq!(inbox(&storage, mary.id, None).await.items.len(), 1);
    assert!(inbox(&storage, outsider.id, None).await.items.is_empty());
    assert!(inbox(&storage, teacher.id, None).await.items.is_empty());
}

#[tokio::test]
async fn role_audiences() {
    let storage = common::storage().await;
    let teacher = common::teacher(&storage).await;
    let other = common::user(&storage, "mrkeating", "Mr. Keating", UserRole::Teacher).await;
    let student = common::user(&storage, "jdoe", "John Doe", UserRole::Student).await;

    let report = notifications::fan_out(
        &storage,
        &teacher,
        announcement(AudienceKind::AllTeachers, vec![]),
    )
    .await
    .unwrap();
    assert_eq!(report.created, 2);
    assert_eq!(inbox(&storage, other.id, None).await.items.len(), 1);
    assert!(inbox(&storage, student.id, None).await.items.is_empty());

    let report = notifications::fan_out(&storage, &teacher, announcement(AudienceKind::All, vec![]))
        .await
        .unwrap();
    assert_eq!(report.created, 3);
    assert_eq!(
        inbox(&storage, student.id, None).await.items[0].audience_tag,
        "all"
    );
}

#[tokio::test]
async fn invalid_audience_and_blank_content_are_rejected() {
    let storage = common::storage().await;
    let teacher = common::teacher(&storage).await;
    let course = common::course(&storage, "Algebra I", teacher.id).await;
    let student = enrolled_student(&storage, course.id, "jdoe", "John Doe").await;

    let err = notifications::fan_out(&storage, &teacher, announcement(AudienceKind::Courses, vec![]))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E005");

    let err = notifications::fan_out(
        &storage,
        &teacher,
        announcement(AudienceKind::Courses, vec![course.id, 9999]),
    )
    .await
    .unwrap_err();
    assert_eq!(err.code(), "E005");

    let mut blank = announcement(AudienceKind::AllStudents, vec![]);
    blank.title = "   ".to_string();
    let err = notifications::fan_out(&storage, &teacher, blank)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E005");

    // 被拒绝的群发不会留下任何记录
    assert!(inbox(&storage, student.id, None).await.items.is_empty());
}

#[tokio::test]
async fn inbox_read_state_is_per_recipient() {
    let storage = common::storage().await;
    let teacher = common::teacher(&storage).await;
    let john = common::user(&storage, "jdoe", "John Doe", UserRole::Student).await;
    let mary = common::user(&storage, "mmajor", "Mary Major", UserRole::Student).await;

    for _ in 0..3 {
        notifications::fan_out(
            &storage,
            &teacher,
            announcement(AudienceKind::AllStudents, vec![]),
        )
        .await
        .unwrap();
    }

    assert_eq!(storage.get_unread_notification_count(john.id).await.unwrap(), 3);

    let first = inbox(&storage, john.id, None).await.items[0].id;
    assert!(storage.mark_notification_as_read(first, john.id).await.unwrap());
    // 不能标记别人的通知
    let marys = inbox(&storage, mary.id, None).await.items[0].id;
    assert!(!storage.mark_notification_as_read(marys, john.id).await.unwrap());

    assert_eq!(storage.get_unread_notification_count(john.id).await.unwrap(), 2);
    assert_eq!(storage.get_unread_notification_count(mary.id).await.unwrap(), 3);

    let unread = inbox(&storage, john.id, Some(true)).await;
    assert_eq!(unread.items.len(), 2);
    assert_eq!(unread.pagination.total, 2);
    assert!(unread.items.iter().all(|n| n.id != first));

    assert_eq!(storage.mark_all_notifications_as_read(john.id).await.unwrap(), 2);
    assert_eq!(storage.get_unread_notification_count(john.id).await.unwrap(), 0);
    assert_eq!(inbox(&storage, john.id, None).await.items.len(), 3);
    assert_eq!(storage.get_unread_notification_count(mary.id).await.unwrap(), 3);
}

#[tokio::test]
async fn one_failed_recipient_does_not_stop_the_rest() {
    let storage = common::storage().await;
    let teacher = common::teacher(&storage).await;
    let course = common::course(&storage, "Algebra I", teacher.id).await;
    let john = enrolled_student(&storage, course.id, "jdoe", "John Doe").await;
    let li = enrolled_student(&storage, course.id, "lwei", "Li Wei").await;
    let mary = enrolled_student(&storage, course.id, "mmajor", "Mary Major").await;

    // 失败的收件人位于中间，前后都有成功写入
    let flaky: Arc<dyn Storage> = Arc::new(RejectingInbox {
        inner: storage.clone(),
        rejected_user: li.id,
    });

    let report = notifications::fan_out(
        &flaky,
        &teacher,
        announcement(AudienceKind::Courses, vec![course.id]),
    )
    .await
    .unwrap();

    assert_eq!(report.recipients, 3);
    assert_eq!(report.created, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(report.reasons.len(), 1);
    assert_eq!(report.reasons[0].user_id, li.id);
    assert_eq!(report.reasons[0].reason, "收件箱不可写");

    assert_eq!(inbox(&storage, john.id, None).await.items.len(), 1);
    assert!(inbox(&storage, li.id, None).await.items.is_empty());
    assert_eq!(inbox(&storage, mary.id, None).await.items.len(), 1);
}
