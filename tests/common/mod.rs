//! 集成测试共用的内存数据库与数据构造
#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_lms_grading::config::DatabaseConfig;
use rust_lms_grading::models::assignments::{
    entities::{Assignment, AssignmentKind},
    requests::CreateAssignmentRequest,
};
use rust_lms_grading::models::courses::{entities::Course, requests::CreateCourseRequest};
use rust_lms_grading::models::quizzes::{
    entities::{AnswerValue, QuestionType, QuizQuestion},
    requests::{CreateQuestionRequest, SubmitAttemptRequest, SubmittedAnswer},
};
use rust_lms_grading::models::users::{
    entities::{User, UserRole},
    requests::CreateUserRequest,
};
use rust_lms_grading::storage::Storage;
use rust_lms_grading::storage::sea_orm_storage::SeaOrmStorage;

/// 新建一个已迁移的内存数据库
pub async fn storage() -> Arc<dyn Storage> {
    let config = DatabaseConfig {
        url: ":memory:".to_string(),
        pool_size: 1,
        timeout: 5,
    };
    let storage = SeaOrmStorage::connect(&config)
        .await
        .expect("in-memory storage");
    Arc::new(storage)
}

pub async fn user(storage: &Arc<dyn Storage>, username: &str, name: &str, role: UserRole) -> User {
    storage
        .create_user(CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@example.edu"),
            display_name: Some(name.to_string()),
            role,
        })
        .await
        .expect("create user")
}

pub async fn teacher(storage: &Arc<dyn Storage>) -> User {
    user(storage, "teacher", "Ms. Frizzle", UserRole::Teacher).await
}

pub async fn course(storage: &Arc<dyn Storage>, name: &str, teacher_id: i64) -> Course {
    storage
        .create_course(CreateCourseRequest {
            name: name.to_string(),
            teacher_id,
            description: None,
        })
        .await
        .expect("create course")
}

/// 创建学生并选入课程
pub async fn enrolled_student(
    storage: &Arc<dyn Storage>,
    course_id: i64,
    username: &str,
    name: &str,
) -> User {
    let student = user(storage, username, name, UserRole::Student).await;
    storage
        .enroll_student(student.id, course_id)
        .await
        .expect("enroll student");
    student
}

pub async fn assignment(
    storage: &Arc<dyn Storage>,
    teacher: &User,
    course_id: i64,
    kind: AssignmentKind,
    points: f64,
    due_date: Option<DateTime<Utc>>,
) -> Assignment {
    storage
        .create_assignment(
            teacher.id,
            CreateAssignmentRequest {
                course_id,
                title: format!("{kind} assignment"),
                kind,
                points,
                due_date,
            },
        )
        .await
        .expect("create assignment")
}

pub async fn question(
    storage: &Arc<dyn Storage>,
    assignment_id: i64,
    position: i32,
    question_type: QuestionType,
    correct: &str,
    points: f64,
) -> QuizQuestion {
    storage
        .add_quiz_question(
            assignment_id,
            CreateQuestionRequest {
                position,
                prompt: format!("Question {position}"),
                question_type,
                correct_answer: text(correct),
                points,
            },
        )
        .await
        .expect("add question")
}

/// 五道 10 分的简答题，正确答案依次为 a..e
pub async fn five_question_quiz(
    storage: &Arc<dyn Storage>,
    teacher: &User,
    course_id: i64,
) -> (Assignment, Vec<QuizQuestion>) {
    let quiz = assignment(storage, teacher, course_id, AssignmentKind::Quiz, 50.0, None).await;
    let mut questions = Vec::new();
    for (i, answer) in ["a", "b", "c", "d", "e"].iter().enumerate() {
        questions.push(
            question(
                storage,
                quiz.id,
                i as i32 + 1,
                QuestionType::ShortAnswer,
                answer,
                10.0,
            )
            .await,
        );
    }
    (quiz, questions)
}

pub fn text(value: &str) -> AnswerValue {
    AnswerValue::Text(value.to_string())
}

pub fn answers(pairs: &[(i64, &str)]) -> SubmitAttemptRequest {
    SubmitAttemptRequest {
        answers: pairs
            .iter()
            .map(|(question_id, answer)| SubmittedAnswer {
                question_id: *question_id,
                answer: text(answer),
            })
            .collect(),
    }
}

/// 浮点比较（分数都是少量加减乘除得到的）
pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
