//! 成绩合成：从作答与手动评分重建选课成绩

mod common;

use common::{approx, answers, enrolled_student, five_question_quiz};
use rust_lms_grading::services::{composition, quizzes};

#[tokio::test]
async fn manual_score_is_clamped_and_final_is_the_sum() {
    let storage = common::storage().await;
    let teacher = common::teacher(&storage).await;
    let course = common::course(&storage, "Algebra I", teacher.id).await;
    let student = enrolled_student(&storage, course.id, "jdoe", "John Doe").await;

    let enrollment = composition::set_manual_score(&storage, student.id, course.id, 75.0)
        .await
        .unwrap();
    assert_eq!(enrollment.manual_score, 60.0);
    assert_eq!(enrollment.quiz_score, 0.0);
    assert_eq!(enrollment.final_score, 60.0);

    let enrollment = composition::set_manual_score(&storage, student.id, course.id, -5.0)
        .await
        .unwrap();
    assert_eq!(enrollment.manual_score, 0.0);
    assert_eq!(enrollment.final_score, 0.0);
}

#[tokio::test]
async fn non_finite_manual_score_is_rejected() {
    let storage = common::storage().await;
    let teacher = common::teacher(&storage).await;
    let course = common::course(&storage, "Algebra I", teacher.id).await;
    let student = enrolled_student(&storage, course.id, "jdoe", "John Doe").await;

    let err = composition::set_manual_score(&storage, student.id, course.id, f64::NAN)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E005");
}

#[tokio::test]
async fn three_of_five_quiz_gives_quiz_score_24() {
    let storage = common::storage().await;
    let teacher = common::teacher(&storage).await;
    let course = common::course(&storage, "Algebra I", teacher.id).await;
    let student = enrolled_student(&storage, course.id, "jdoe", "John Doe").await;
    let (quiz, questions) = five_question_quiz(&storage, &teacher, course.id).await;

    let attempt = quizzes::start_attempt(&storage, student.id, quiz.id)
        .await
        .unwrap();
    let submitted = quizzes::submit_attempt(
        &storage,
        student.id,
        attempt.id,
        answers(&[
            (questions[0].id, "a"),
            (questions[1].id, "b"),
            (questions[2].id, "c"),
            (questions[3].id, "x"),
            (questions[4].id, "y"),
        ]),
    )
    .await
    .unwrap();
    assert_eq!(submitted.attempt.score, Some(60.0));
    assert_eq!(submitted.passed, Some(false));

    // 交卷后成绩已自动刷新
    let enrollment = storage
        .get_enrollment(student.id, course.id)
        .await
        .unwrap()
        .unwrap();
    assert!(approx(enrollment.quiz_score, 24.0));

    let enrollment = composition::set_manual_score(&storage, student.id, course.id, 45.0)
        .await
        .unwrap();
    assert!(approx(enrollment.quiz_score, 24.0));
    assert_eq!(enrollment.manual_score, 45.0);
    assert!(approx(
        enrollment.final_score,
        enrollment.quiz_score + enrollment.manual_score
    ));
}

#[tokio::test]
async fn open_and_unattempted_quizzes_do_not_count_as_zero() {
    let storage = common::storage().await;
    let teacher = common::teacher(&storage).await;
    let course = common::course(&storage, "Algebra I", teacher.id).await;
    let student = enrolled_student(&storage, course.id, "jdoe", "John Doe").await;
    let (graded, questions) = five_question_quiz(&storage, &teacher, course.id).await;
    let (started, _) = five_question_quiz(&storage, &teacher, course.id).await;
    five_question_quiz(&storage, &teacher, course.id).await;

    let attempt = quizzes::start_attempt(&storage, student.id, graded.id)
        .await
        .unwrap();
    quizzes::submit_attempt(
        &storage,
        student.id,
        attempt.id,
        answers(&[
            (questions[0].id, "a"),
            (questions[1].id, "b"),
            (questions[2].id, "c"),
        ]),
    )
    .await
    .unwrap();
    // 第二个测验只开始未交卷，第三个从未作答
    quizzes::start_attempt(&storage, student.id, started.id)
        .await
        .unwrap();

    let enrollment = composition::recompute_enrollment(&storage, student.id, course.id)
        .await
        .unwrap();
    assert!(approx(enrollment.quiz_score, 24.0));
    assert!(approx(enrollment.final_score, 24.0));
}

#[tokio::test]
async fn recompute_is_idempotent() {
    let storage = common::storage().await;
    let teacher = common::teacher(&storage).await;
    let course = common::course(&storage, "Algebra I", teacher.id).await;
    let student = enrolled_student(&storage, course.id, "jdoe", "John Doe").await;
    let (quiz, questions) = five_question_quiz(&storage, &teacher, course.id).await;

    let attempt = quizzes::start_attempt(&storage, student.id, quiz.id)
        .await
        .unwrap();
    quizzes::submit_attempt(
        &storage,
        student.id,
        attempt.id,
        answers(&[(questions[0].id, "a"), (questions[1].id, "b")]),
    )
    .await
    .unwrap();
    composition::set_manual_score(&storage, student.id, course.id, 33.3)
        .await
        .unwrap();

    let first = composition::recompute_enrollment(&storage, student.id, course.id)
        .await
        .unwrap();
    let second = composition::recompute_enrollment(&storage, student.id, course.id)
        .await
        .unwrap();

    assert_eq!(first.quiz_score.to_bits(), second.quiz_score.to_bits());
    assert_eq!(first.manual_score.to_bits(), second.manual_score.to_bits());
    assert_eq!(first.final_score.to_bits(), second.final_score.to_bits());
    assert!(approx(first.quiz_score, 16.0));
}

#[tokio::test]
async fn recompute_without_enrollment_is_a_consistency_error() {
    let storage = common::storage().await;
    let teacher = common::teacher(&storage).await;
    let course = common::course(&storage, "Algebra I", teacher.id).await;
    let outsider = common::user(
        &storage,
        "outsider",
        "Out Sider",
        rust_lms_grading::models::users::entities::UserRole::Student,
    )
    .await;

    let err = composition::recompute_enrollment(&storage, outsider.id, course.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E014");
}
