use serde::Serialize;
use ts_rs::TS;

// 家长列表行，students 为子女姓名
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/parent.ts")]
pub struct ParentRow {
    pub id: String,
    pub username: String,
    pub name: String,
    pub surname: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: String,
    pub students: Vec<String>,
}
