use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireRole};
use crate::models::courses::requests::ManualScoreRequest;
use crate::models::users::entities::UserRole;
use crate::services::{CompositionService, ReconciliationService};

static COMPOSITION_SERVICE: Lazy<CompositionService> = Lazy::new(CompositionService::new_lazy);
static RECONCILIATION_SERVICE: Lazy<ReconciliationService> =
    Lazy::new(ReconciliationService::new_lazy);

// 重新计算学生课程成绩
pub async fn recompute(req: HttpRequest, path: web::Path<(i64, i64)>) -> ActixResult<HttpResponse> {
    let (course_id, student_id) = path.into_inner();
    COMPOSITION_SERVICE
        .recompute(&req, course_id, student_id)
        .await
}

// 设置手动评分
pub async fn set_manual_score(
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
    body: web::Json<ManualScoreRequest>,
) -> ActixResult<HttpResponse> {
    let (course_id, student_id) = path.into_inner();
    COMPOSITION_SERVICE
        .set_manual_score(&req, course_id, student_id, body.manual_score)
        .await
}

// 导出成绩表
pub async fn export_grades(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    RECONCILIATION_SERVICE
        .export_grades(&req, path.into_inner())
        .await
}

// 导入成绩表
pub async fn import_grades(
    req: HttpRequest,
    path: web::Path<i64>,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    RECONCILIATION_SERVICE
        .import_grades(&req, path.into_inner(), payload)
        .await
}

// 导出考勤表
pub async fn export_attendance(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    RECONCILIATION_SERVICE
        .export_attendance(&req, path.into_inner())
        .await
}

// 导入考勤表
pub async fn import_attendance(
    req: HttpRequest,
    path: web::Path<i64>,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    RECONCILIATION_SERVICE
        .import_attendance(&req, path.into_inner(), payload)
        .await
}

// 下载考勤模板
pub async fn attendance_template() -> ActixResult<HttpResponse> {
    RECONCILIATION_SERVICE.attendance_template().await
}

// 配置路由（课程下的接口全部仅限教师和管理员）
pub fn configure_course_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/courses")
            .wrap(RequireRole::new_any(UserRole::staff_roles()))
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/{id}/students/{student_id}/recompute")
                    .route(web::post().to(recompute)),
            )
            .service(
                web::resource("/{id}/students/{student_id}/manual-score")
                    .route(web::put().to(set_manual_score)),
            )
            .service(web::resource("/{id}/grades/export").route(web::get().to(export_grades)))
            .service(web::resource("/{id}/grades/import").route(web::post().to(import_grades)))
            .service(
                web::resource("/{id}/attendance/export").route(web::get().to(export_attendance)),
            )
            .service(
                web::resource("/{id}/attendance/import").route(web::post().to(import_attendance)),
            ),
    );
}

pub fn configure_attendance_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/attendance")
            .wrap(RequireRole::new_any(UserRole::staff_roles()))
            .wrap(middlewares::RequireJWT)
            .service(web::resource("/template").route(web::get().to(attendance_template))),
    );
}
