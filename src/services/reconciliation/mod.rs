//! 批量对账：成绩表与考勤表的导入导出

pub mod attendance;
pub mod csv_io;
pub mod grades;
mod upload;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::error;

use crate::config::AppConfig;
use crate::errors::LmsError;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub use attendance::{attendance_template, export_attendance, import_attendance};
pub use grades::{export_grades, import_grades};

pub struct ReconciliationService {
    storage: Option<Arc<dyn Storage>>,
}

impl ReconciliationService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        super::resolve_storage(self.storage.as_ref(), request)
    }

    /// 导出课程成绩表
    pub async fn export_grades(
        &self,
        request: &HttpRequest,
        course_id: i64,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match export_grades(&storage, course_id).await {
            Ok(data) => Ok(csv_io::csv_response(
                &format!("course_{course_id}_grades.csv"),
                data,
            )),
            Err(e) => Ok(export_failed(e)),
        }
    }

    /// 导入课程成绩表
    pub async fn import_grades(
        &self,
        request: &HttpRequest,
        course_id: i64,
        mut payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let limits = &AppConfig::get().import;

        let data = match upload::read_file_from_multipart(&mut payload, limits.max_file_size).await
        {
            Ok(data) => data,
            Err(msg) => return Ok(upload_failed(msg)),
        };

        match import_grades(&storage, course_id, &data, limits).await {
            Ok(report) => Ok(HttpResponse::Ok().json(ApiResponse::success(report, "导入完成"))),
            Err(e) => Ok(e.to_http_response()),
        }
    }

    /// 导出课程考勤表
    pub async fn export_attendance(
        &self,
        request: &HttpRequest,
        course_id: i64,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match export_attendance(&storage, course_id).await {
            Ok(data) => Ok(csv_io::csv_response(
                &format!("course_{course_id}_attendance.csv"),
                data,
            )),
            Err(e) => Ok(export_failed(e)),
        }
    }

    /// 导入课程考勤表
    pub async fn import_attendance(
        &self,
        request: &HttpRequest,
        course_id: i64,
        mut payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let recorder = match crate::services::current_user(request) {
            Ok(user) => user,
            Err(e) => return Ok(e.to_http_response()),
        };
        let limits = &AppConfig::get().import;

        let data = match upload::read_file_from_multipart(&mut payload, limits.max_file_size).await
        {
            Ok(data) => data,
            Err(msg) => return Ok(upload_failed(msg)),
        };

        match import_attendance(&storage, course_id, Some(recorder.id), &data, limits).await {
            Ok(report) => Ok(HttpResponse::Ok().json(ApiResponse::success(report, "导入完成"))),
            Err(e) => Ok(e.to_http_response()),
        }
    }

    /// 下载考勤导入模板
    pub async fn attendance_template(&self) -> ActixResult<HttpResponse> {
        match attendance_template() {
            Ok(data) => Ok(csv_io::csv_response("attendance_template.csv", data)),
            Err(e) => Ok(export_failed(e)),
        }
    }
}

fn upload_failed(msg: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::FileUploadFailed,
        format!("文件读取失败: {msg}"),
    ))
}

fn export_failed(e: LmsError) -> HttpResponse {
    error!("CSV export failed: {e}");
    e.to_http_response()
}
