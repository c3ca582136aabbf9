use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::PaginationQuery;
use crate::utils::validate::{FieldErrors, Validate, normalize_optional};

// 班级查询参数（来自HTTP请求）
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
    #[serde(default, rename = "supervisorId", alias = "supervisor_id")]
    pub supervisor_id: Option<String>,
}

// 创建/更新班级
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassInput {
    pub name: String,
    pub capacity: i32,
    pub grade_id: i64,
    pub supervisor_id: Option<String>,
}

impl ClassInput {
    pub fn supervisor_id(&self) -> Option<String> {
        normalize_optional(&self.supervisor_id)
    }
}

impl Validate for ClassInput {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("name", &self.name, "Class name is required");
        errors.length("name", &self.name, 1, 50);
        if !(1..=200).contains(&self.capacity) {
            errors.add("capacity", "Capacity must be between 1 and 200");
        }
        errors.into_result()
    }
}
