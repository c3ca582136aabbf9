use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct Class {
    // 班级ID
    pub id: i64,
    // 班级名称
    pub name: String,
    // 容量
    pub capacity: i32,
    // 班主任（教师ID）
    pub supervisor_id: Option<String>,
    // 年级ID
    pub grade_id: i64,
}
