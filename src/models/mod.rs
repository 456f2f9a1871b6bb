//! 业务模型
//!
//! 与 `entity` 中的数据库实体分离：这里的类型是显式声明了必填/可选字段的业务记录，
//! 所有字符串判别字段都建模为封闭枚举。

use serde::Serialize;
use ts_rs::TS;

/// 定义以字符串形式存储/传输的封闭枚举
///
/// 自动生成：
/// - enum 定义（Serialize / TS 使用给定的字符串值）
/// - as_str() 与 ALL 常量
/// - Display / FromStr
/// - 通过 FromStr 实现的 Deserialize（错误信息列出所有合法值）
macro_rules! define_string_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident ($label:literal) {
            $($variant:ident => $value:literal),* $(,)?
        }
    ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, ts_rs::TS)]
        $(#[$meta])*
        pub enum $name {
            $(#[serde(rename = $value)] $variant,)*
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),*];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value,)*
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ::std::string::String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)*
                    _ => Err(format!(
                        "无效的{}: '{}'. 支持: {}",
                        $label,
                        s,
                        [$($value),*].join(", ")
                    )),
                }
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = <::std::string::String as serde::Deserialize>::deserialize(deserializer)?;
                s.parse::<$name>().map_err(serde::de::Error::custom)
            }
        }
    };
}

pub mod assignments;
pub mod attendance;
pub mod common;
pub mod courses;
pub mod notifications;
pub mod quizzes;
pub mod reconciliation;
pub mod submissions;
pub mod users;

pub use common::{ApiResponse, PaginationInfo, PaginationQuery};

/// API 业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "api.ts")]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    InternalServerError = 1005,

    // 课程与成绩
    CourseNotFound = 2000,
    EnrollmentNotFound = 2001,
    ScoreInconsistent = 2002,

    // 作业与提交
    AssignmentNotFound = 3000,
    AssignmentHasDependents = 3001,
    SubmissionNotFound = 3010,
    SubmissionAlreadyExists = 3011,
    InvalidStateTransition = 3012,

    // 测验
    QuizAttemptNotFound = 3100,
    QuizAttemptAlreadyExists = 3101,

    // 导入导出
    FileUploadFailed = 4000,
    ImportFileParseFailed = 4001,
    ImportFileMissingColumn = 4002,
    ImportFileDataInvalid = 4003,

    // 通知
    NotificationNotFound = 5000,
}
