use serde::Serialize;
use ts_rs::TS;

// 班级列表行
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassRow {
    pub id: i64,
    pub name: String,
    pub capacity: i32,
    pub grade_level: Option<i32>,
    pub supervisor_id: Option<String>,
    pub supervisor_name: Option<String>,
}
