use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::{info, warn};

use super::AssignmentService;
use crate::errors::{LmsError, Result};
use crate::models::ApiResponse;
use crate::storage::Storage;

/// 删除作业：仍有提交或测验作答引用时拒绝删除
pub async fn delete_assignment(storage: &Arc<dyn Storage>, assignment_id: i64) -> Result<()> {
    if storage.get_assignment_by_id(assignment_id).await?.is_none() {
        return Err(LmsError::not_found(format!("作业 {assignment_id} 不存在")));
    }

    let dependents = storage.count_assignment_dependents(assignment_id).await?;
    if !dependents.is_empty() {
        warn!(
            "Refusing to delete assignment {}: {} submissions, {} quiz attempts",
            assignment_id, dependents.submissions, dependents.quiz_attempts
        );
        return Err(LmsError::invalid_state(format!(
            "作业仍有 {} 份提交与 {} 条测验作答，不能删除",
            dependents.submissions, dependents.quiz_attempts
        )));
    }

    if !storage.delete_assignment(assignment_id).await? {
        return Err(LmsError::not_found(format!("作业 {assignment_id} 不存在")));
    }

    info!("Assignment {assignment_id} deleted");
    Ok(())
}

pub async fn handle_delete_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match delete_assignment(&storage, assignment_id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("作业已删除"))),
        Err(e) => Ok(e.to_http_response()),
    }
}
