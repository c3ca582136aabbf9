use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_optional_i64;
use crate::models::users::entities::Sex;
use crate::models::users::requests::ProfileInput;
use crate::utils::validate::{FieldErrors, Validate};

// 学生列表查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
    // 由该教师授课的班级中的学生
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

// 创建/更新学生
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentInput {
    pub id: Option<String>,
    #[serde(flatten)]
    #[ts(flatten)]
    pub profile: ProfileInput,
    pub img: Option<String>,
    pub blood_type: String,
    pub sex: Sex,
    pub birthday: chrono::DateTime<chrono::Utc>,
    pub parent_id: String,
    pub class_id: i64,
    pub grade_id: i64,
}

impl Validate for StudentInput {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        self.profile.collect_errors(&mut errors);
        errors.require("blood_type", &self.blood_type, "Blood type is required");
        errors.length("blood_type", &self.blood_type, 1, 5);
        errors.require("parent_id", &self.parent_id, "Parent is required");
        if self.birthday > chrono::Utc::now() {
            errors.add("birthday", "Birthday cannot be in the future");
        }
        errors.into_result()
    }
}
