use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::users::entities::Sex;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct Teacher {
    pub id: String,
    pub username: String,
    pub name: String,
    pub surname: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: String,
    // 头像地址
    pub img: Option<String>,
    pub blood_type: String,
    pub sex: Sex,
    pub birthday: chrono::DateTime<chrono::Utc>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
