use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/announcement.ts")]
pub struct Announcement {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub date: chrono::DateTime<chrono::Utc>,
    pub class_id: Option<i64>,
}
