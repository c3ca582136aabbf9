use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::PaginationQuery;
use crate::utils::validate::{FieldErrors, Validate};

// 科目列表查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub struct SubjectListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
}

// 创建/更新科目，teachers 为任课教师 ID
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub struct SubjectInput {
    pub name: String,
    #[serde(default)]
    pub teachers: Vec<String>,
}

impl SubjectInput {
    pub fn name(&self) -> String {
        self.name.trim().to_string()
    }
}

impl Validate for SubjectInput {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("name", &self.name, "Subject name is required");
        errors.length("name", &self.name, 1, 50);
        if self.teachers.is_empty() {
            errors.add("teachers", "At least one teacher is required");
        }
        errors.into_result()
    }
}
