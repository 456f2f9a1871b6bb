use actix_web::{HttpRequest, HttpResponse, error};
use tracing::debug;

use crate::models::{ApiResponse, ErrorCode};

/// JSON 请求体解析失败时返回统一格式
pub fn json_error_handler(err: error::JsonPayloadError, req: &HttpRequest) -> error::Error {
    debug!("Invalid JSON body for {}: {}", req.path(), err);
    let response = HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::BadRequest,
        format!("请求体格式错误: {err}"),
    ));
    error::InternalError::from_response(err, response).into()
}

/// 查询参数解析失败时返回统一格式
pub fn query_error_handler(err: error::QueryPayloadError, req: &HttpRequest) -> error::Error {
    debug!("Invalid query string for {}: {}", req.path(), err);
    let response = HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::BadRequest,
        format!("查询参数错误: {err}"),
    ));
    error::InternalError::from_response(err, response).into()
}

/// 路径参数解析失败时返回统一格式
pub fn path_error_handler(err: error::PathError, req: &HttpRequest) -> error::Error {
    debug!("Invalid path parameter for {}: {}", req.path(), err);
    let response = HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::BadRequest,
        format!("路径参数错误: {err}"),
    ));
    error::InternalError::from_response(err, response).into()
}
