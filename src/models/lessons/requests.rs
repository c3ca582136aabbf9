use serde::Deserialize;
use ts_rs::TS;

use super::entities::Day;
use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_optional_i64;
use crate::utils::validate::{FieldErrors, Validate};

// 课程列表查询参数，teacherId 与 classId 同时生效
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/lesson.ts")]
pub struct LessonListParams {
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

// 课表查询参数（日历视图）
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/lesson.ts")]
pub struct ScheduleParams {
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

impl From<ScheduleParams> for LessonListParams {
    fn from(params: ScheduleParams) -> Self {
        Self {
            teacher_id: params.teacher_id,
            class_id: params.class_id,
            ..Default::default()
        }
    }
}

// 创建/更新课程
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/lesson.ts")]
pub struct LessonInput {
    pub name: String,
    pub day: Day,
    pub start_time: chrono::DateTime<chrono::Utc>,
    pub end_time: chrono::DateTime<chrono::Utc>,
    pub subject_id: i64,
    pub class_id: i64,
    pub teacher_id: String,
}

impl Validate for LessonInput {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("name", &self.name, "Lesson name is required");
        errors.length("name", &self.name, 1, 100);
        errors.require("teacher_id", &self.teacher_id, "Teacher is required");
        if self.end_time <= self.start_time {
            errors.add("end_time", "End time must be after start time");
        }
        errors.into_result()
    }
}
