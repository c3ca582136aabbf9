use serde::Serialize;
use ts_rs::TS;

// 存活探针
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct HealthStatus {
    pub status: String,
    pub system_name: String,
    pub environment: String,
    pub uptime_seconds: i64,
}
