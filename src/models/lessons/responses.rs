use serde::Serialize;
use ts_rs::TS;

use super::entities::Day;

// 课程列表行
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/lesson.ts")]
pub struct LessonRow {
    pub id: i64,
    pub name: String,
    pub day: Day,
    pub subject_name: String,
    pub class_name: String,
    pub teacher_name: String,
    pub start_time: chrono::DateTime<chrono::Utc>,
    pub end_time: chrono::DateTime<chrono::Utc>,
}

// 日历条目
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/lesson.ts")]
pub struct ScheduleEntry {
    pub id: i64,
    pub title: String,
    pub start: chrono::DateTime<chrono::Utc>,
    pub end: chrono::DateTime<chrono::Utc>,
}
