use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_optional_i64;
use crate::models::users::entities::Sex;
use crate::models::users::requests::ProfileInput;
use crate::utils::validate::{FieldErrors, Validate};

// 教师列表查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct TeacherListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
    // 只看在该班级授课的教师
    #[serde(
        default,
        rename = "classId",
        alias = "class_id",
        deserialize_with = "deserialize_optional_i64"
    )]
    pub class_id: Option<i64>,
}

// 创建/更新教师
//
// id 为认证服务下发的用户 ID，创建时缺省则自动生成
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct TeacherInput {
    pub id: Option<String>,
    #[serde(flatten)]
    #[ts(flatten)]
    pub profile: ProfileInput,
    pub img: Option<String>,
    pub blood_type: String,
    pub sex: Sex,
    pub birthday: chrono::DateTime<chrono::Utc>,
    #[serde(default)]
    pub subjects: Vec<i64>,
}

impl Validate for TeacherInput {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        self.profile.collect_errors(&mut errors);
        errors.require("blood_type", &self.blood_type, "Blood type is required");
        errors.length("blood_type", &self.blood_type, 1, 5);
        if self.birthday > chrono::Utc::now() {
            errors.add("birthday", "Birthday cannot be in the future");
        }
        errors.into_result()
    }
}
