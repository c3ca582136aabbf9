use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 成绩，关联考试或作业之一
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct ExamResult {
    pub id: i64,
    pub score: i32,
    pub exam_id: Option<i64>,
    pub assignment_id: Option<i64>,
    pub student_id: String,
}
