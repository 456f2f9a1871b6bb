use serde::Serialize;
use ts_rs::TS;

use super::entities::Notification;
use crate::models::common::PaginationInfo;

/// 通知列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "notification.ts")]
pub struct NotificationListResponse {
    pub items: Vec<Notification>,
    pub pagination: PaginationInfo,
}

/// 未读通知数量响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "notification.ts")]
pub struct UnreadCountResponse {
    pub unread_count: i64,
}

/// 标记全部已读响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "notification.ts")]
pub struct MarkAllReadResponse {
    pub marked_count: i64,
}

/// 单个收件人的失败原因
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "notification.ts")]
pub struct FanoutFailure {
    pub user_id: i64,
    pub reason: String,
}

/// 群发结果：部分失败不会中断其余收件人
#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export, export_to = "notification.ts")]
pub struct FanoutReport {
    pub recipients: usize,
    pub created: usize,
    pub failed: usize,
    pub reasons: Vec<FanoutFailure>,
}
