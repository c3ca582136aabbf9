use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::PaginationQuery;
use crate::models::users::requests::ProfileInput;
use crate::utils::validate::{FieldErrors, Validate};

// 家长列表查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/parent.ts")]
pub struct ParentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
}

// 创建/更新家长
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/parent.ts")]
pub struct ParentInput {
    pub id: Option<String>,
    #[serde(flatten)]
    #[ts(flatten)]
    pub profile: ProfileInput,
}

impl Validate for ParentInput {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        self.profile.collect_errors(&mut errors);
        errors.into_result()
    }
}
