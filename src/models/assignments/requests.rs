use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_optional_i64;
use crate::utils::validate::{FieldErrors, Validate};

// 作业列表查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct AssignmentListParams {
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

// 创建/更新作业
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct AssignmentInput {
    pub title: String,
    pub start_date: chrono::DateTime<chrono::Utc>,
    pub due_date: chrono::DateTime<chrono::Utc>,
    pub lesson_id: i64,
}

impl Validate for AssignmentInput {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("title", &self.title, "Title is required");
        errors.length("title", &self.title, 1, 100);
        if self.due_date < self.start_date {
            errors.add("due_date", "Due date cannot be before start date");
        }
        errors.into_result()
    }
}
