use std::sync::Arc;

use chrono::{DateTime, Utc};

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

use crate::errors::Result;

pub mod sea_orm_storage;

/// 成绩记录存储
///
/// 每个组件只通过这里的具名读写操作访问数据，不直接拼装查询。
#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户方法
    // 创建用户（身份系统账号镜像）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 列出活跃用户ID，None 表示所有角色
    async fn list_active_user_ids(&self, role: Option<UserRole>) -> Result<Vec<i64>>;

    /// 课程与选课方法
    // 创建课程
    async fn create_course(&self, course: CreateCourseRequest) -> Result<Course>;
    // 通过ID获取课程信息
    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>>;
    // 学生选课
    async fn enroll_student(&self, student_id: i64, course_id: i64) -> Result<Enrollment>;
    // 获取选课记录
    async fn get_enrollment(&self, student_id: i64, course_id: i64)
    -> Result<Option<Enrollment>>;
    // 课程花名册（按学生ID排序）
    async fn list_course_roster(&self, course_id: i64) -> Result<Vec<RosterEntry>>;
    // 选了任一课程的学生ID（已去重）
    async fn list_student_ids_in_courses(&self, course_ids: &[i64]) -> Result<Vec<i64>>;
    // 同时写入三个成绩字段
    async fn update_enrollment_scores(
        &self,
        enrollment_id: i64,
        scores: ScoreBreakdown,
    ) -> Result<Enrollment>;

    /// 作业方法
    // 创建作业
    async fn create_assignment(
        &self,
        created_by: i64,
        assignment: CreateAssignmentRequest,
    ) -> Result<Assignment>;
    // 通过ID获取作业
    async fn get_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>>;
    // 统计引用作业的提交与测验作答
    async fn count_assignment_dependents(&self, assignment_id: i64)
    -> Result<AssignmentDependents>;
    // 删除作业
    async fn delete_assignment(&self, assignment_id: i64) -> Result<bool>;

    /// 测验方法
    // 添加题目
    async fn add_quiz_question(
        &self,
        assignment_id: i64,
        question: CreateQuestionRequest,
    ) -> Result<QuizQuestion>;
    // 列出题目（按位置排序）
    async fn list_quiz_questions(&self, assignment_id: i64) -> Result<Vec<QuizQuestion>>;
    // 开始作答，重复开始返回 DuplicateAttempt
    async fn create_quiz_attempt(&self, assignment_id: i64, student_id: i64)
    -> Result<QuizAttempt>;
    // 通过ID获取作答
    async fn get_quiz_attempt(&self, attempt_id: i64) -> Result<Option<QuizAttempt>>;
    // 获取学生在某测验上的作答
    async fn get_quiz_attempt_by_student(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<QuizAttempt>>;
    // 列出作答的全部答案
    async fn list_quiz_answers(&self, attempt_id: i64) -> Result<Vec<QuizAnswer>>;
    // 交卷：在一个事务中写入全部答案、分数与结束时间
    async fn close_quiz_attempt(
        &self,
        attempt_id: i64,
        graded: GradedAttempt,
        ended_at: DateTime<Utc>,
    ) -> Result<QuizAttempt>;
    // 重新评分：在一个事务中替换全部答案与分数
    async fn replace_quiz_grading(
        &self,
        attempt_id: i64,
        graded: GradedAttempt,
    ) -> Result<QuizAttempt>;
    // 学生在课程内已结束的测验分数（按作业ID排序）
    async fn list_closed_attempt_scores(&self, student_id: i64, course_id: i64)
    -> Result<Vec<f64>>;

    /// 提交方法
    // 创建提交，重复提交返回 DuplicateSubmission
    async fn create_submission(&self, submission: NewSubmission) -> Result<Submission>;
    // 获取学生对某作业的提交
    async fn get_submission_by_student(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>>;
    // 写入评分
    async fn record_submission_grade(
        &self,
        submission_id: i64,
        grade: SubmissionGrade,
    ) -> Result<Submission>;
    // 列出作业的全部提交
    async fn list_assignment_submissions(&self, assignment_id: i64) -> Result<Vec<Submission>>;

    /// 通知方法
    // 创建通知
    async fn create_notification(&self, req: CreateNotificationRequest) -> Result<Notification>;
    // 列出用户通知（分页）
    async fn list_notifications_with_pagination(
        &self,
        user_id: i64,
        query: NotificationListQuery,
    ) -> Result<NotificationListResponse>;
    // 获取未读通知数量
    async fn get_unread_notification_count(&self, user_id: i64) -> Result<i64>;
    // 标记单条已读（只能标记自己的通知）
    async fn mark_notification_as_read(&self, notification_id: i64, user_id: i64)
    -> Result<bool>;
    // 标记全部已读
    async fn mark_all_notifications_as_read(&self, user_id: i64) -> Result<i64>;

    /// 考勤方法
    // 按 课程+学生+日期 写入或覆盖
    async fn upsert_attendance(&self, record: AttendanceUpsert) -> Result<AttendanceRecord>;
    // 列出课程考勤（按日期、学生排序）
    async fn list_course_attendance(&self, course_id: i64) -> Result<Vec<AttendanceRecord>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
