use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

define_string_enum! {
    /// 用户角色
    #[ts(export, export_to = "user.ts")]
    pub enum UserRole("用户角色") {
        Student => "student",
        Teacher => "teacher",
        Admin => "admin",
    }
}

impl UserRole {
    pub fn staff_roles() -> &'static [&'static UserRole] {
        &[&Self::Teacher, &Self::Admin]
    }

    pub fn all_roles() -> &'static [&'static UserRole] {
        &[&Self::Student, &Self::Teacher, &Self::Admin]
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, UserRole::Teacher | UserRole::Admin)
    }
}

define_string_enum! {
    /// 用户状态
    #[ts(export, export_to = "user.ts")]
    pub enum UserStatus("用户状态") {
        Active => "active",
        Inactive => "inactive",
        Suspended => "suspended",
    }
}

// 用户实体（身份由外部系统管理，这里只保存评分需要的姓名、角色与收件人信息）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "user.ts")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub display_name: Option<String>,
    pub role: UserRole,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// 成绩表与考勤表中使用的姓名
    pub fn full_name(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.username)
    }
}
