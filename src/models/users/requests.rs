use serde::Deserialize;
use ts_rs::TS;

use super::entities::UserRole;

// 用户同步请求（由身份系统推送的账号镜像）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "user.ts")]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub display_name: Option<String>,
    pub role: UserRole,
}
