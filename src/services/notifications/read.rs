use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::NotificationService;
use crate::models::notifications::responses::MarkAllReadResponse;
use crate::models::{ApiResponse, ErrorCode};

pub async fn mark_as_read(
    service: &NotificationService,
    request: &HttpRequest,
    notification_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = match crate::services::current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(e.to_http_response()),
    };

    // 只能标记自己的通知，别人的通知视为不存在
    match storage.mark_notification_as_read(notification_id, user.id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("已标记为已读"))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotificationNotFound,
            "通知不存在",
        ))),
        Err(e) => Ok(e.to_http_response()),
    }
}

pub async fn mark_all_as_read(
    service: &NotificationService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = match crate::services::current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(e.to_http_response()),
    };

    match storage.mark_all_notifications_as_read(user.id).await {
        Ok(marked_count) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            MarkAllReadResponse { marked_count },
            "已全部标记为已读",
        ))),
        Err(e) => Ok(e.to_http_response()),
    }
}
