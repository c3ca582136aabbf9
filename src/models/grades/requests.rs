use serde::Deserialize;
use ts_rs::TS;

use crate::utils::validate::{FieldErrors, Validate};

// 创建年级
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeInput {
    pub level: i32,
}

impl Validate for GradeInput {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if !(1..=12).contains(&self.level) {
            errors.add("level", "Grade level must be between 1 and 12");
        }
        errors.into_result()
    }
}
