use serde::Serialize;
use ts_rs::TS;

// 公告列表行
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/announcement.ts")]
pub struct AnnouncementRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub class_name: Option<String>,
    pub date: chrono::DateTime<chrono::Utc>,
}
