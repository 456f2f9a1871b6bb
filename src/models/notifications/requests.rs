use serde::Deserialize;
use ts_rs::TS;

use super::entities::{AudienceKind, NotificationPriority, NotificationType};
use crate::models::common::PaginationQuery;

// 通知列表查询参数
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "notification.ts")]
pub struct NotificationListQuery {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default)]
    pub unread_only: Option<bool>,
}

// 群发通知请求（发送者来自令牌）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "notification.ts")]
pub struct FanoutRequest {
    pub audience: AudienceKind,
    #[serde(default)]
    pub course_ids: Vec<i64>,
    pub title: String,
    pub message: String,
    #[serde(default = "default_type")]
    pub notification_type: NotificationType,
    #[serde(default = "default_priority")]
    pub priority: NotificationPriority,
}

fn default_type() -> NotificationType {
    NotificationType::Announcement
}

fn default_priority() -> NotificationPriority {
    NotificationPriority::Normal
}

/// 单条通知写入
#[derive(Debug, Clone)]
pub struct CreateNotificationRequest {
    pub user_id: i64,
    pub notification_type: NotificationType,
    pub priority: NotificationPriority,
    pub sender_id: Option<i64>,
    pub sender_role: Option<String>,
    pub audience_tag: String,
    pub title: String,
    pub content: String,
    pub reference_type: Option<String>,
    pub reference_id: Option<i64>,
}
