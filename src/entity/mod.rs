//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行读写，然后通过 `into_xxx()` 转换为 models 中的业务实体。
//! 时间统一以 Unix 秒保存，枚举以字符串保存。

use chrono::{DateTime, Utc};

pub mod prelude;

pub mod assignments;
pub mod attendance;
pub mod courses;
pub mod enrollments;
pub mod notifications;
pub mod quiz_answers;
pub mod quiz_attempts;
pub mod quiz_questions;
pub mod submissions;
pub mod users;

pub(crate) fn from_unix(secs: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(secs, 0).unwrap_or_default()
}
