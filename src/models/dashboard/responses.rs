use serde::Serialize;
use ts_rs::TS;

// 各类用户数量
#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct UserCounts {
    pub admins: i64,
    pub teachers: i64,
    pub students: i64,
    pub parents: i64,
}

// 学生性别分布
#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct SexCounts {
    pub male: i64,
    pub female: i64,
}

// 某个工作日的出勤统计
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct AttendanceDay {
    pub day: String,
    pub present: i64,
    pub absent: i64,
}
