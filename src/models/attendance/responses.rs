use serde::Serialize;
use ts_rs::TS;

// 考勤列表行
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceRow {
    pub id: i64,
    pub student_id: String,
    pub student_name: String,
    pub lesson_name: String,
    pub date: chrono::DateTime<chrono::Utc>,
    pub present: bool,
}
