use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_optional_i64;
use crate::utils::validate::{FieldErrors, Validate};

// 公告列表查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/announcement.ts")]
pub struct AnnouncementListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
    #[serde(
        default,
        rename = "classId",
        alias = "class_id",
        deserialize_with = "deserialize_optional_i64"
    )]
    pub class_id: Option<i64>,
}

// 创建/更新公告
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/announcement.ts")]
pub struct AnnouncementInput {
    pub title: String,
    pub description: String,
    pub date: chrono::DateTime<chrono::Utc>,
    pub class_id: Option<i64>,
}

impl Validate for AnnouncementInput {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("title", &self.title, "Title is required");
        errors.length("title", &self.title, 1, 100);
        errors.require("description", &self.description, "Description is required");
        errors.into_result()
    }
}
