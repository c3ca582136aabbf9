use serde::Serialize;
use ts_rs::TS;

use super::entities::Student;

// 学生列表行
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentRow {
    pub id: String,
    pub username: String,
    pub name: String,
    pub surname: String,
    pub phone: Option<String>,
    pub address: String,
    pub img: Option<String>,
    pub class_name: String,
    pub grade_level: Option<i32>,
}

// 学生详情
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub student: Student,
    pub class_name: String,
    pub parent_name: String,
    pub grade_level: Option<i32>,
    pub lesson_count: i64,
}
