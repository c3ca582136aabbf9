use serde::Serialize;
use ts_rs::TS;

use super::entities::Teacher;

// 教师列表行
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct TeacherRow {
    pub id: String,
    pub username: String,
    pub name: String,
    pub surname: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: String,
    pub img: Option<String>,
    pub subjects: Vec<String>,
    pub classes: Vec<String>,
}

// 教师详情（含科目、课程、班级数量）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct TeacherDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub teacher: Teacher,
    pub subject_count: i64,
    pub lesson_count: i64,
    pub class_count: i64,
}
