use serde::Serialize;
use ts_rs::TS;

// 考试列表行
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct ExamRow {
    pub id: i64,
    pub title: String,
    pub subject_name: String,
    pub class_name: String,
    pub teacher_name: String,
    pub start_time: chrono::DateTime<chrono::Utc>,
}
