use serde::Serialize;
use ts_rs::TS;

// 作业列表行
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct AssignmentRow {
    pub id: i64,
    pub title: String,
    pub subject_name: String,
    pub class_name: String,
    pub teacher_name: String,
    pub due_date: chrono::DateTime<chrono::Utc>,
}
