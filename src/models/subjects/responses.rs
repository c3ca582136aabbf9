use serde::Serialize;
use ts_rs::TS;

// 科目列表行，teachers 为任课教师姓名
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub struct SubjectRow {
    pub id: i64,
    pub name: String,
    pub teachers: Vec<String>,
}
