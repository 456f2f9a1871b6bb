//! 提交状态规则
//!
//! 持久化状态只有 submitted / graded；pending、missing、late 都在读取时推导。

use chrono::{DateTime, Utc};

use crate::errors::{LmsError, Result};
use crate::models::assignments::entities::Assignment;
use crate::models::submissions::entities::{Submission, SubmissionState, SubmissionStatus};

/// 评分界面展示的状态
pub fn derive_state(
    assignment: &Assignment,
    submission: Option<&Submission>,
    now: DateTime<Utc>,
) -> SubmissionState {
    match submission {
        None if assignment.is_past_due(now) => SubmissionState::Missing,
        None => SubmissionState::Pending,
        Some(s) if s.status == SubmissionStatus::Graded => SubmissionState::Graded,
        Some(s) if s.is_late => SubmissionState::Late,
        Some(_) => SubmissionState::Submitted,
    }
}

/// 文件引用与正文至少提供一个；空白视为未提供
pub fn normalize_content(
    file_ref: Option<String>,
    body: Option<String>,
) -> Result<(Option<String>, Option<String>)> {
    let file_ref = file_ref.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
    let body = body.filter(|s| !s.trim().is_empty());

    if file_ref.is_none() && body.is_none() {
        return Err(LmsError::validation("文件引用与文本内容至少需要提供一项"));
    }
    Ok((file_ref, body))
}

/// 分数必须是有限数且落在 [0, points]
pub fn validate_grade(grade: f64, points: f64) -> Result<()> {
    if !grade.is_finite() {
        return Err(LmsError::validation("分数必须是有效数字"));
    }
    if grade < 0.0 || grade > points {
        return Err(LmsError::validation(format!(
            "分数 {grade} 超出范围，应在 0 到 {points} 之间"
        )));
    }
    Ok(())
}

/// 只有已提交或已评分的记录可以评分
pub fn ensure_gradable(submission: Option<Submission>) -> Result<Submission> {
    submission.ok_or_else(|| LmsError::invalid_state("学生尚未提交，无法评分"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignments::entities::AssignmentKind;
    use chrono::Duration;

    fn assignment(due_date: Option<DateTime<Utc>>) -> Assignment {
        let now = Utc::now();
        Assignment {
            id: 1,
            course_id: 1,
            title: "Essay".into(),
            kind: AssignmentKind::Manual,
            points: 20.0,
            due_date,
            created_by: 1,
            created_at: now,
            updated_at: now,
        }
    }

    fn submission(status: SubmissionStatus, is_late: bool) -> Submission {
        Submission {
            id: 1,
            assignment_id: 1,
            student_id: 2,
            file_ref: None,
            body: Some("text".into()),
            status,
            is_late,
            grade: None,
            feedback: None,
            graded_by: None,
            submitted_at: Utc::now(),
            graded_at: None,
        }
    }

    #[test]
    fn test_absent_submission_states() {
        let now = Utc::now();
        let open = assignment(Some(now + Duration::days(1)));
        let closed = assignment(Some(now - Duration::days(1)));
        let undated = assignment(None);

        assert_eq!(derive_state(&open, None, now), SubmissionState::Pending);
        assert_eq!(derive_state(&closed, None, now), SubmissionState::Missing);
        assert_eq!(derive_state(&undated, None, now), SubmissionState::Pending);
    }

    #[test]
    fn test_present_submission_states() {
        let now = Utc::now();
        let a = assignment(None);
        let on_time = submission(SubmissionStatus::Submitted, false);
        let late = submission(SubmissionStatus::Submitted, true);
        let graded_late = submission(SubmissionStatus::Graded, true);

        assert_eq!(derive_state(&a, Some(&on_time), now), SubmissionState::Submitted);
        assert_eq!(derive_state(&a, Some(&late), now), SubmissionState::Late);
        assert_eq!(derive_state(&a, Some(&graded_late), now), SubmissionState::Graded);
    }

    #[test]
    fn test_grade_bounds() {
        assert!(validate_grade(0.0, 20.0).is_ok());
        assert!(validate_grade(20.0, 20.0).is_ok());
        assert!(validate_grade(20.5, 20.0).is_err());
        assert!(validate_grade(-1.0, 20.0).is_err());
        assert!(validate_grade(f64::NAN, 20.0).is_err());
        assert!(validate_grade(f64::INFINITY, 20.0).is_err());
    }

    #[test]
    fn test_content_required() {
        assert!(normalize_content(None, Some("   ".into())).is_err());
        let (file_ref, body) = normalize_content(Some(" files/a.pdf ".into()), None).unwrap();
        assert_eq!(file_ref.as_deref(), Some("files/a.pdf"));
        assert!(body.is_none());
    }

    #[test]
    fn test_grading_absent_submission_is_invalid_state() {
        let err = ensure_gradable(None).unwrap_err();
        assert_eq!(err.code(), "E013");
    }
}
