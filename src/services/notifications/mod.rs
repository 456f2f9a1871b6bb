//! 通知分发与收件箱

pub mod count;
pub mod fanout;
pub mod list;
pub mod read;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::Result;
use crate::models::assignments::entities::Assignment;
use crate::models::notifications::{
    entities::{Notification, NotificationPriority, NotificationType},
    requests::{CreateNotificationRequest, FanoutRequest, NotificationListQuery},
};
use crate::models::submissions::entities::Submission;
use crate::models::users::entities::User;
use crate::storage::Storage;

pub use fanout::{fan_out, resolve_recipients};

pub struct NotificationService {
    storage: Option<Arc<dyn Storage>>,
}

impl NotificationService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        super::resolve_storage(self.storage.as_ref(), request)
    }

    /// 群发通知
    pub async fn fan_out(
        &self,
        request: &HttpRequest,
        req: FanoutRequest,
    ) -> ActixResult<HttpResponse> {
        fanout::handle_fan_out(self, request, req).await
    }

    /// 当前用户的通知列表
    pub async fn list_notifications(
        &self,
        request: &HttpRequest,
        query: NotificationListQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_notifications(self, request, query).await
    }

    /// 未读数量
    pub async fn get_unread_count(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        count::get_unread_count(self, request).await
    }

    /// 标记单条已读
    pub async fn mark_as_read(
        &self,
        request: &HttpRequest,
        notification_id: i64,
    ) -> ActixResult<HttpResponse> {
        read::mark_as_read(self, request, notification_id).await
    }

    /// 标记全部已读
    pub async fn mark_all_as_read(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        read::mark_all_as_read(self, request).await
    }
}

/// 评分后通知学生
pub async fn notify_grade_posted(
    storage: &Arc<dyn Storage>,
    grader: &User,
    assignment: &Assignment,
    submission: &Submission,
) -> Result<Notification> {
    let grade = submission.grade.unwrap_or_default();
    storage
        .create_notification(CreateNotificationRequest {
            user_id: submission.student_id,
            notification_type: NotificationType::GradePosted,
            priority: NotificationPriority::Normal,
            sender_id: Some(grader.id),
            sender_role: Some(grader.role.to_string()),
            audience_tag: "direct".to_string(),
            title: format!("作业「{}」已评分", assignment.title),
            content: format!("得分 {grade:.2} / {:.2}", assignment.points),
            reference_type: Some("submission".to_string()),
            reference_id: Some(submission.id),
        })
        .await
}
