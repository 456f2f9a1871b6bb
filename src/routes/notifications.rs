use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireRole};
use crate::models::notifications::requests::{FanoutRequest, NotificationListQuery};
use crate::models::users::entities::UserRole;
use crate::services::NotificationService;

// 懒加载的全局 NotificationService 实例
static NOTIFICATION_SERVICE: Lazy<NotificationService> = Lazy::new(NotificationService::new_lazy);

// 列出当前用户的通知
pub async fn list_notifications(
    req: HttpRequest,
    query: web::Query<NotificationListQuery>,
) -> ActixResult<HttpResponse> {
    NOTIFICATION_SERVICE
        .list_notifications(&req, query.into_inner())
        .await
}

// 未读数量
pub async fn get_unread_count(req: HttpRequest) -> ActixResult<HttpResponse> {
    NOTIFICATION_SERVICE.get_unread_count(&req).await
}

// 标记单条已读
pub async fn mark_as_read(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    NOTIFICATION_SERVICE
        .mark_as_read(&req, path.into_inner())
        .await
}

// 标记全部已读
pub async fn mark_all_as_read(req: HttpRequest) -> ActixResult<HttpResponse> {
    NOTIFICATION_SERVICE.mark_all_as_read(&req).await
}

// 群发通知
pub async fn fan_out(req: HttpRequest, body: web::Json<FanoutRequest>) -> ActixResult<HttpResponse> {
    NOTIFICATION_SERVICE.fan_out(&req, body.into_inner()).await
}

// 配置路由
pub fn configure_notification_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/notifications")
            .wrap(middlewares::RequireJWT)
            .service(web::resource("").route(web::get().to(list_notifications)))
            .service(web::resource("/unread-count").route(web::get().to(get_unread_count)))
            .service(web::resource("/read-all").route(web::put().to(mark_all_as_read)))
            // 群发 - 仅教师和管理员
            .service(
                web::resource("/fanout").route(
                    web::post()
                        .to(fan_out)
                        .wrap(RequireRole::new_any(UserRole::staff_roles())),
                ),
            )
            .service(web::resource("/{id}/read").route(web::put().to(mark_as_read))),
    );
}
