use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireRole};
use crate::models::quizzes::requests::SubmitAttemptRequest;
use crate::models::users::entities::UserRole;
use crate::services::QuizService;

// 懒加载的全局 QuizService 实例
static QUIZ_SERVICE: Lazy<QuizService> = Lazy::new(QuizService::new_lazy);

// 开始作答
pub async fn start_attempt(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE.start_attempt(&req, path.into_inner()).await
}

// 作答详情
pub async fn get_attempt(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE.get_attempt(&req, path.into_inner()).await
}

// 交卷
pub async fn submit_attempt(
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<SubmitAttemptRequest>,
) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE
        .submit_attempt(&req, path.into_inner(), body.into_inner())
        .await
}

// 重新评分
pub async fn regrade_attempt(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE.regrade_attempt(&req, path.into_inner()).await
}

// 配置路由
pub fn configure_quiz_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/quizzes")
            .wrap(middlewares::RequireJWT)
            // 作答详情 - 作答学生本人或教师/管理员（业务层检查）
            .service(web::resource("/attempts/{attempt_id}").route(web::get().to(get_attempt)))
            // 交卷 - 仅学生，业务层检查是否本人
            .service(
                web::resource("/attempts/{attempt_id}/submit").route(
                    web::post()
                        .to(submit_attempt)
                        .wrap(RequireRole::new(&UserRole::Student)),
                ),
            )
            // 重新评分 - 仅教师和管理员
            .service(
                web::resource("/attempts/{attempt_id}/regrade").route(
                    web::post()
                        .to(regrade_attempt)
                        .wrap(RequireRole::new_any(UserRole::staff_roles())),
                ),
            )
            // 开始作答 - 仅学生
            .service(
                web::resource("/{assignment_id}/attempts").route(
                    web::post()
                        .to(start_attempt)
                        .wrap(RequireRole::new(&UserRole::Student)),
                ),
            ),
    );
}
