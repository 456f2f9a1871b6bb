use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;
use std::sync::Arc;

use super::{SubmissionService, lifecycle};
use crate::errors::{LmsError, Result};
use crate::models::ApiResponse;
use crate::models::submissions::responses::{SubmissionOverviewItem, SubmissionOverviewResponse};
use crate::storage::Storage;

/// 评分界面：每个选课学生一行，附带推导出的状态
pub async fn list_assignment_submissions(
    storage: &Arc<dyn Storage>,
    assignment_id: i64,
) -> Result<SubmissionOverviewResponse> {
    let assignment = storage
        .get_assignment_by_id(assignment_id)
        .await?
        .ok_or_else(|| LmsError::not_found(format!("作业 {assignment_id} 不存在")))?;

    let roster = storage.list_course_roster(assignment.course_id).await?;
    let mut submissions: HashMap<i64, _> = storage
        .list_assignment_submissions(assignment_id)
        .await?
        .into_iter()
        .map(|s| (s.student_id, s))
        .collect();

    let now = chrono::Utc::now();
    let items = roster
        .into_iter()
        .map(|entry| {
            let submission = submissions.remove(&entry.student.id);
            SubmissionOverviewItem {
                student_id: entry.student.id,
                student_name: entry.student.full_name().to_string(),
                state: lifecycle::derive_state(&assignment, submission.as_ref(), now),
                submission,
            }
        })
        .collect();

    Ok(SubmissionOverviewResponse {
        assignment_id,
        items,
    })
}

pub async fn handle_list_submissions(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match list_assignment_submissions(&storage, assignment_id).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response, "查询成功"))),
        Err(e) => Ok(e.to_http_response()),
    }
}
