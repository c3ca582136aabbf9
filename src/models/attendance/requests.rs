use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_optional_i64;
use crate::utils::validate::{FieldErrors, Validate};

// 考勤列表查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
    #[serde(default, rename = "studentId", alias = "student_id")]
    pub student_id: Option<String>,
    #[serde(
        default,
        rename = "lessonId",
        alias = "lesson_id",
        deserialize_with = "deserialize_optional_i64"
    )]
    pub lesson_id: Option<i64>,
}

// 创建/更新考勤记录
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceInput {
    pub date: chrono::DateTime<chrono::Utc>,
    pub present: bool,
    pub student_id: String,
    pub lesson_id: i64,
}

impl Validate for AttendanceInput {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("student_id", &self.student_id, "Student is required");
        errors.into_result()
    }
}
