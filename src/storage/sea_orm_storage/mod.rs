//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite（文件或内存）、PostgreSQL 和 MySQL。

mod assignments;
mod attendance;
mod courses;
mod notifications;
mod quizzes;
mod submissions;
mod users;

use crate::config::{AppConfig, DatabaseConfig};
use crate::errors::{LmsError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlErr};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 按全局配置创建存储实例
    pub async fn new_async() -> Result<Self> {
        Self::connect(&AppConfig::get().database).await
    }

    /// 连接数据库并运行迁移
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let db_url = Self::build_database_url(&config.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        Migrator::up(&db, None)
            .await
            .map_err(|e| LmsError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM storage ready, database: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（文件库使用 WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let in_memory = url.contains(":memory:");

        let mut opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| LmsError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));

        if !in_memory {
            opt = opt
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .pragma("cache_size", "-64000")
                .pragma("temp_store", "memory")
                .pragma("wal_autocheckpoint", "1000");
        }

        // 内存库只在至少一个连接存活时存在，因此固定单连接且不回收
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
                .max_connections(config.pool_size.max(1))
                .min_connections(1)
                .test_before_acquire(true)
                .idle_timeout(Duration::from_secs(300))
        };

        let pool = pool_options
            .acquire_timeout(Duration::from_secs(config.timeout))
            .connect_with(opt)
            .await
            .map_err(|e| LmsError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.timeout))
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| LmsError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url == ":memory:" || url == "sqlite::memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(LmsError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, :memory:, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

/// 唯一索引冲突
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

// Storage trait 实现
use crate::models::{
    assignments::{
        entities::{Assignment, AssignmentDependents},
        requests::CreateAssignmentRequest,
    },
    attendance::entities::{AttendanceRecord, AttendanceUpsert},
    courses::{
        entities::{Course, Enrollment, RosterEntry, ScoreBreakdown},
        requests::CreateCourseRequest,
    },
    notifications::{
        entities::Notification,
        requests::{CreateNotificationRequest, NotificationListQuery},
        responses::NotificationListResponse,
    },
    quizzes::{
        entities::{GradedAttempt, QuizAnswer, QuizAttempt, QuizQuestion},
        requests::CreateQuestionRequest,
    },
    submissions::entities::{NewSubmission, Submission, SubmissionGrade},
    users::{
        entities::{User, UserRole},
        requests::CreateUserRequest,
    },
};
use crate::storage::Storage;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn list_active_user_ids(&self, role: Option<UserRole>) -> Result<Vec<i64>> {
        self.list_active_user_ids_impl(role).await
    }

    // 课程模块
    async fn create_course(&self, course: CreateCourseRequest) -> Result<Course> {
        self.create_course_impl(course).await
    }

    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>> {
        self.get_course_by_id_impl(course_id).await
    }

    async fn enroll_student(&self, student_id: i64, course_id: i64) -> Result<Enrollment> {
        self.enroll_student_impl(student_id, course_id).await
    }

    async fn get_enrollment(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<Option<Enrollment>> {
        self.get_enrollment_impl(student_id, course_id).await
    }

    async fn list_course_roster(&self, course_id: i64) -> Result<Vec<RosterEntry>> {
        self.list_course_roster_impl(course_id).await
    }

    async fn list_student_ids_in_courses(&self, course_ids: &[i64]) -> Result<Vec<i64>> {
        self.list_student_ids_in_courses_impl(course_ids).await
    }

    async fn update_enrollment_scores(
        &self,
        enrollment_id: i64,
        scores: ScoreBreakdown,
    ) -> Result<Enrollment> {
        self.update_enrollment_scores_impl(enrollment_id, scores)
            .await
    }

    // 作业模块
    async fn create_assignment(
        &self,
        created_by: i64,
        assignment: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        self.create_assignment_impl(created_by, assignment).await
    }

    async fn get_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(assignment_id).await
    }

    async fn count_assignment_dependents(
        &self,
        assignment_id: i64,
    ) -> Result<AssignmentDependents> {
        self.count_assignment_dependents_impl(assignment_id).await
    }

    async fn delete_assignment(&self, assignment_id: i64) -> Result<bool> {
        self.delete_assignment_impl(assignment_id).await
    }

    // 测验模块
    async fn add_quiz_question(
        &self,
        assignment_id: i64,
        question: CreateQuestionRequest,
    ) -> Result<QuizQuestion> {
        self.add_quiz_question_impl(assignment_id, question).await
    }

    async fn list_quiz_questions(&self, assignment_id: i64) -> Result<Vec<QuizQuestion>> {
        self.list_quiz_questions_impl(assignment_id).await
    }

    async fn create_quiz_attempt(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<QuizAttempt> {
        self.create_quiz_attempt_impl(assignment_id, student_id)
            .await
    }

    async fn get_quiz_attempt(&self, attempt_id: i64) -> Result<Option<QuizAttempt>> {
        self.get_quiz_attempt_impl(attempt_id).await
    }

    async fn get_quiz_attempt_by_student(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<QuizAttempt>> {
        self.get_quiz_attempt_by_student_impl(assignment_id, student_id)
            .await
    }

    async fn list_quiz_answers(&self, attempt_id: i64) -> Result<Vec<QuizAnswer>> {
        self.list_quiz_answers_impl(attempt_id).await
    }

    async fn close_quiz_attempt(
        &self,
        attempt_id: i64,
        graded: GradedAttempt,
        ended_at: DateTime<Utc>,
    ) -> Result<QuizAttempt> {
        self.close_quiz_attempt_impl(attempt_id, graded, ended_at)
            .await
    }

    async fn replace_quiz_grading(
        &self,
        attempt_id: i64,
        graded: GradedAttempt,
    ) -> Result<QuizAttempt> {
        self.replace_quiz_grading_impl(attempt_id, graded).await
    }

    async fn list_closed_attempt_scores(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<Vec<f64>> {
        self.list_closed_attempt_scores_impl(student_id, course_id)
            .await
    }

    // 提交模块
    async fn create_submission(&self, submission: NewSubmission) -> Result<Submission> {
        self.create_submission_impl(submission).await
    }

    async fn get_submission_by_student(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        self.get_submission_by_student_impl(assignment_id, student_id)
            .await
    }

    async fn record_submission_grade(
        &self,
        submission_id: i64,
        grade: SubmissionGrade,
    ) -> Result<Submission> {
        self.record_submission_grade_impl(submission_id, grade)
            .await
    }

    async fn list_assignment_submissions(&self, assignment_id: i64) -> Result<Vec<Submission>> {
        self.list_assignment_submissions_impl(assignment_id).await
    }

    // 通知模块
    async fn create_notification(&self, req: CreateNotificationRequest) -> Result<Notification> {
        self.create_notification_impl(req).await
    }

    async fn list_notifications_with_pagination(
        &self,
        user_id: i64,
        query: NotificationListQuery,
    ) -> Result<NotificationListResponse> {
        self.list_notifications_with_pagination_impl(user_id, query)
            .await
    }

    async fn get_unread_notification_count(&self, user_id: i64) -> Result<i64> {
        self.get_unread_notification_count_impl(user_id).await
    }

    async fn mark_notification_as_read(
        &self,
        notification_id: i64,
        user_id: i64,
    ) -> Result<bool> {
        self.mark_notification_as_read_impl(notification_id, user_id)
            .await
    }

    async fn mark_all_notifications_as_read(&self, user_id: i64) -> Result<i64> {
        self.mark_all_notifications_as_read_impl(user_id).await
    }

    // 考勤模块
    async fn upsert_attendance(&self, record: AttendanceUpsert) -> Result<AttendanceRecord> {
        self.upsert_attendance_impl(record).await
    }

    async fn list_course_attendance(&self, course_id: i64) -> Result<Vec<AttendanceRecord>> {
        self.list_course_attendance_impl(course_id).await
    }
}
