//! 数据模型定义
//!
//! 每个业务实体一个子模块：`entities` 为业务实体，`requests` 为查询参数与表单，
//! `responses` 为列表行等返回结构。

pub mod announcements;
pub mod assignments;
pub mod attendance;
pub mod classes;
pub mod common;
pub mod dashboard;
pub mod events;
pub mod exams;
pub mod grades;
pub mod lessons;
pub mod parents;
pub mod results;
pub mod students;
pub mod subjects;
pub mod system;
pub mod teachers;
pub mod users;

pub use common::{
    ApiResponse, MutationOutcome, MutationResult, PaginatedResponse, PaginationInfo,
    PaginationQuery, RecordId,
};

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// API 业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    InternalServerError = 1005,
    ValidationFailed = 1006,
    Conflict = 1009,

    // 列表与详情
    ListFailed = 2001,
    TeacherNotFound = 2101,
    StudentNotFound = 2102,
    InvalidDate = 2201,
}
