use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_optional_i64;
use crate::utils::validate::{FieldErrors, Validate};

// 考试列表查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct ExamListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
    #[serde(default, rename = "teacherId", alias = "teacher_id")]
    pub teacher_id: Option<String>,
    #[serde(
        default,
        rename = "classId",
        alias = "class_id",
        deserialize_with = "deserialize_optional_i64"
    )]
    pub class_id: Option<i64>,
}

// 创建/更新考试
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct ExamInput {
    pub title: String,
    pub start_time: chrono::DateTime<chrono::Utc>,
    pub end_time: chrono::DateTime<chrono::Utc>,
    pub lesson_id: i64,
}

impl Validate for ExamInput {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("title", &self.title, "Title is required");
        errors.length("title", &self.title, 1, 100);
        if self.end_time <= self.start_time {
            errors.add("end_time", "End time must be after start time");
        }
        errors.into_result()
    }
}
