//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。
//! 单条记录的操作要么完全成功，要么返回这里的错误；
//! 批量操作（导入、通知分发）的逐行问题不会变成错误，而是写进结果报告。

use std::fmt;

use actix_web::HttpResponse;
use actix_web::http::StatusCode;

use crate::models::{ApiResponse, ErrorCode};

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_lms_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum LmsError {
            $($variant(String),)*
        }

        impl LmsError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(LmsError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(LmsError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(LmsError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl LmsError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        LmsError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_lms_errors! {
    DatabaseConfig("E001", "Database Configuration Error"),
    DatabaseConnection("E002", "Database Connection Error"),
    DatabaseOperation("E003", "Database Operation Error"),
    FileOperation("E004", "File Operation Error"),
    Validation("E005", "Validation Error"),
    NotFound("E006", "Resource Not Found"),
    Serialization("E007", "Serialization Error"),
    DateParse("E008", "Date Parse Error"),
    Authentication("E009", "Authentication Error"),
    Authorization("E010", "Authorization Error"),
    DuplicateSubmission("E011", "Duplicate Submission"),
    DuplicateAttempt("E012", "Duplicate Quiz Attempt"),
    InvalidState("E013", "Invalid State Transition"),
    Consistency("E014", "Consistency Error"),
    ImportFormat("E015", "Import Format Error"),
}

impl LmsError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            LmsError::Validation(_) | LmsError::DateParse(_) | LmsError::ImportFormat(_) => {
                StatusCode::BAD_REQUEST
            }
            LmsError::NotFound(_) => StatusCode::NOT_FOUND,
            LmsError::Authentication(_) => StatusCode::UNAUTHORIZED,
            LmsError::Authorization(_) => StatusCode::FORBIDDEN,
            LmsError::DuplicateSubmission(_)
            | LmsError::DuplicateAttempt(_)
            | LmsError::InvalidState(_) => StatusCode::CONFLICT,
            LmsError::Consistency(_) => StatusCode::UNPROCESSABLE_ENTITY,
            LmsError::DatabaseConfig(_)
            | LmsError::DatabaseConnection(_)
            | LmsError::DatabaseOperation(_)
            | LmsError::FileOperation(_)
            | LmsError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 对应的 API 业务错误码
    pub fn api_code(&self) -> ErrorCode {
        match self {
            LmsError::Validation(_) | LmsError::DateParse(_) => ErrorCode::BadRequest,
            LmsError::NotFound(_) => ErrorCode::NotFound,
            LmsError::Authentication(_) => ErrorCode::Unauthorized,
            LmsError::Authorization(_) => ErrorCode::Forbidden,
            LmsError::DuplicateSubmission(_) => ErrorCode::SubmissionAlreadyExists,
            LmsError::DuplicateAttempt(_) => ErrorCode::QuizAttemptAlreadyExists,
            LmsError::InvalidState(_) => ErrorCode::InvalidStateTransition,
            LmsError::Consistency(_) => ErrorCode::ScoreInconsistent,
            LmsError::ImportFormat(_) => ErrorCode::ImportFileParseFailed,
            _ => ErrorCode::InternalServerError,
        }
    }

    /// 转换为统一格式的 HTTP 响应
    pub fn to_http_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(ApiResponse::error_empty(self.api_code(), self.message()))
    }
}

impl fmt::Display for LmsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for LmsError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for LmsError {
    fn from(err: sea_orm::DbErr) -> Self {
        LmsError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for LmsError {
    fn from(err: std::io::Error) -> Self {
        LmsError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for LmsError {
    fn from(err: serde_json::Error) -> Self {
        LmsError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for LmsError {
    fn from(err: chrono::ParseError) -> Self {
        LmsError::DateParse(err.to_string())
    }
}

impl From<csv::Error> for LmsError {
    fn from(err: csv::Error) -> Self {
        LmsError::ImportFormat(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LmsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(LmsError::database_config("test").code(), "E001");
        assert_eq!(LmsError::validation("test").code(), "E005");
        assert_eq!(LmsError::duplicate_submission("test").code(), "E011");
        assert_eq!(LmsError::import_format("test").code(), "E015");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            LmsError::consistency("test").error_type(),
            "Consistency Error"
        );
        assert_eq!(LmsError::validation("test").error_type(), "Validation Error");
    }

    #[test]
    fn test_error_message() {
        let err = LmsError::validation("grade out of range");
        assert_eq!(err.message(), "grade out of range");
    }

    #[test]
    fn test_format_simple() {
        let err = LmsError::invalid_state("nothing to grade");
        let formatted = err.format_simple();
        assert!(formatted.contains("Invalid State Transition"));
        assert!(formatted.contains("nothing to grade"));
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            LmsError::duplicate_submission("x").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            LmsError::validation("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            LmsError::database_operation("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
