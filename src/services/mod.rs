pub mod assignments;
pub mod composition;
pub mod notifications;
pub mod quizzes;
pub mod reconciliation;
pub mod submissions;

pub use assignments::AssignmentService;
pub use composition::CompositionService;
pub use notifications::NotificationService;
pub use quizzes::QuizService;
pub use reconciliation::ReconciliationService;
pub use submissions::SubmissionService;

use actix_web::{HttpRequest, Result as ActixResult, web};
use std::sync::Arc;

use crate::errors::{LmsError, Result};
use crate::middlewares::RequireJWT;
use crate::models::users::entities::User;
use crate::storage::Storage;

/// 服务自带的存储优先，否则从 app data 中获取
pub(crate) fn resolve_storage(
    own: Option<&Arc<dyn Storage>>,
    request: &HttpRequest,
) -> ActixResult<Arc<dyn Storage>> {
    if let Some(storage) = own {
        return Ok(storage.clone());
    }
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("Storage not found in app data"))
}

/// 当前登录用户（由 RequireJWT 写入请求扩展）
pub(crate) fn current_user(request: &HttpRequest) -> Result<User> {
    RequireJWT::extract_user_claims(request).ok_or_else(|| LmsError::authentication("未登录"))
}
