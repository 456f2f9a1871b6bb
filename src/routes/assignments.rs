use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireRole};
use crate::models::submissions::requests::{CreateSubmissionRequest, GradeSubmissionRequest};
use crate::models::users::entities::UserRole;
use crate::services::{AssignmentService, SubmissionService};

static ASSIGNMENT_SERVICE: Lazy<AssignmentService> = Lazy::new(AssignmentService::new_lazy);
static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);

// 删除作业
pub async fn delete_assignment(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .delete_assignment(&req, path.into_inner())
        .await
}

// 创建提交
pub async fn create_submission(
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<CreateSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .create_submission(&req, path.into_inner(), body.into_inner())
        .await
}

// 作业提交概览
pub async fn list_submissions(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .list_submissions(&req, path.into_inner())
        .await
}

// 评分
pub async fn grade_submission(
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
    body: web::Json<GradeSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    let (assignment_id, student_id) = path.into_inner();
    SUBMISSION_SERVICE
        .grade_submission(&req, assignment_id, student_id, body.into_inner())
        .await
}

// 配置路由
pub fn configure_assignment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/assignments")
            .wrap(middlewares::RequireJWT)
            // 删除作业 - 仅教师和管理员，仍有提交或作答时拒绝
            .service(
                web::resource("/{id}").route(
                    web::delete()
                        .to(delete_assignment)
                        .wrap(RequireRole::new_any(UserRole::staff_roles())),
                ),
            )
            .service(
                web::resource("/{id}/submissions")
                    // 提交作业 - 仅学生
                    .route(
                        web::post()
                            .to(create_submission)
                            .wrap(RequireRole::new(&UserRole::Student)),
                    )
                    // 提交概览 - 仅教师和管理员
                    .route(
                        web::get()
                            .to(list_submissions)
                            .wrap(RequireRole::new_any(UserRole::staff_roles())),
                    ),
            )
            // 评分 - 仅教师和管理员
            .service(
                web::resource("/{id}/submissions/{student_id}/grade").route(
                    web::put()
                        .to(grade_submission)
                        .wrap(RequireRole::new_any(UserRole::staff_roles())),
                ),
            ),
    );
}
