use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::NotificationService;
use crate::models::ApiResponse;
use crate::models::notifications::requests::NotificationListQuery;

pub async fn list_notifications(
    service: &NotificationService,
    request: &HttpRequest,
    query: NotificationListQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = match crate::services::current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(e.to_http_response()),
    };

    match storage.list_notifications_with_pagination(user.id, query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response, "查询成功"))),
        Err(e) => Ok(e.to_http_response()),
    }
}
