use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_optional_i64;
use crate::utils::validate::{FieldErrors, Validate};

// 活动列表查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/event.ts")]
pub struct EventListParams {
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

// 按日期查询活动（仪表盘日历）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/event.ts")]
pub struct EventsOnDateParams {
    // YYYY-MM-DD，缺省为当天（UTC）
    pub date: Option<String>,
}

// 创建/更新活动
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/event.ts")]
pub struct EventInput {
    pub title: String,
    pub description: String,
    pub start_time: chrono::DateTime<chrono::Utc>,
    pub end_time: chrono::DateTime<chrono::Utc>,
    pub class_id: Option<i64>,
}

impl Validate for EventInput {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("title", &self.title, "Title is required");
        errors.length("title", &self.title, 1, 100);
        errors.require("description", &self.description, "Description is required");
        if self.end_time <= self.start_time {
            errors.add("end_time", "End time must be after start time");
        }
        errors.into_result()
    }
}
