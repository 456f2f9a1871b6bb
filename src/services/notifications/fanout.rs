use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{info, warn};

use super::NotificationService;
use crate::errors::{LmsError, Result};
use crate::models::ApiResponse;
use crate::models::notifications::{
    entities::Audience,
    requests::{CreateNotificationRequest, FanoutRequest},
    responses::{FanoutFailure, FanoutReport},
};
use crate::models::users::entities::{User, UserRole};
use crate::storage::Storage;

/// 将受众解析为去重后的收件人（按用户ID升序）
pub async fn resolve_recipients(
    storage: &Arc<dyn Storage>,
    audience: &Audience,
) -> Result<BTreeSet<i64>> {
    let ids = match audience {
        Audience::All => storage.list_active_user_ids(None).await?,
        Audience::AllStudents => storage.list_active_user_ids(Some(UserRole::Student)).await?,
        Audience::AllTeachers => storage.list_active_user_ids(Some(UserRole::Teacher)).await?,
        Audience::Courses(course_ids) => {
            for course_id in course_ids {
                if storage.get_course_by_id(*course_id).await?.is_none() {
                    return Err(LmsError::validation(format!("课程 {course_id} 不存在")));
                }
            }
            storage.list_student_ids_in_courses(course_ids).await?
        }
    };
    Ok(ids.into_iter().collect())
}

/// 群发通知：每个收件人一条记录，单个失败不影响其余收件人
pub async fn fan_out(
    storage: &Arc<dyn Storage>,
    sender: &User,
    req: FanoutRequest,
) -> Result<FanoutReport> {
    let title = req.title.trim();
    let message = req.message.trim();
    if title.is_empty() || message.is_empty() {
        return Err(LmsError::validation("通知标题和内容不能为空"));
    }

    let audience = Audience::from_selector(req.audience, &req.course_ids)?;
    let recipients = resolve_recipients(storage, &audience).await?;
    let audience_tag = audience.tag();

    let mut report = FanoutReport {
        recipients: recipients.len(),
        ..Default::default()
    };

    for user_id in recipients {
        let notification = CreateNotificationRequest {
            user_id,
            notification_type: req.notification_type,
            priority: req.priority,
            sender_id: Some(sender.id),
            sender_role: Some(sender.role.to_string()),
            audience_tag: audience_tag.clone(),
            title: title.to_string(),
            content: message.to_string(),
            reference_type: None,
            reference_id: None,
        };

        match storage.create_notification(notification).await {
            Ok(_) => report.created += 1,
            Err(e) => {
                warn!("Failed to notify user {user_id}: {e}");
                report.failed += 1;
                report.reasons.push(FanoutFailure {
                    user_id,
                    reason: e.message().to_string(),
                });
            }
        }
    }

    info!(
        "Fan-out '{}' from user {}: {} recipients, {} created, {} failed",
        audience_tag, sender.id, report.recipients, report.created, report.failed
    );
    Ok(report)
}

pub async fn handle_fan_out(
    service: &NotificationService,
    request: &HttpRequest,
    req: FanoutRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let sender = match crate::services::current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(e.to_http_response()),
    };

    match fan_out(&storage, &sender, req).await {
        Ok(report) => Ok(HttpResponse::Ok().json(ApiResponse::success(report, "通知已发送"))),
        Err(e) => Ok(e.to_http_response()),
    }
}
