use serde::Serialize;
use ts_rs::TS;

// 成绩列表行；title、teacher、class、date 取自关联的考试或作业
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct ResultRow {
    pub id: i64,
    pub title: String,
    pub student_id: String,
    pub student_name: String,
    pub teacher_name: String,
    pub class_name: String,
    pub score: i32,
    pub date: chrono::DateTime<chrono::Utc>,
}
