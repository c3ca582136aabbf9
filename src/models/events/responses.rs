use serde::Serialize;
use ts_rs::TS;

// 活动列表行，class_name 为空表示全校活动
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/event.ts")]
pub struct EventRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub class_name: Option<String>,
    pub start_time: chrono::DateTime<chrono::Utc>,
    pub end_time: chrono::DateTime<chrono::Utc>,
}
