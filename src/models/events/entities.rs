use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 活动，class_id 为空表示全校可见
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/event.ts")]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub start_time: chrono::DateTime<chrono::Utc>,
    pub end_time: chrono::DateTime<chrono::Utc>,
    pub class_id: Option<i64>,
}
