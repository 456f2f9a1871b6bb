//! 配置管理
//!
//! 配置来源按优先级从低到高：`config.toml` → `config.{APP_ENV}.toml` → `LMS_*` 环境变量 → 显式环境变量覆盖。

mod r#impl;
mod structs;

pub use structs::*;
