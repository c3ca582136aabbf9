//! 业务服务层
//!
//! 每个实体一个服务：列表与详情读取按访问者角色构造条件后交给存储层，
//! 写操作由不依赖 actix 的 `create_* / update_* / delete_*` 函数完成，
//! 服务方法只负责从请求中取出存储与访问者并包装响应。

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, web};
use serde::Serialize;
use tracing::error;
use ts_rs::TS;

use crate::config::AppConfig;
use crate::errors::Result;
use crate::middlewares::RequireJWT;
use crate::models::users::entities::Viewer;
use crate::models::users::requests::ProfileInput;
use crate::models::{ApiResponse, ErrorCode, MutationResult, RecordId};
use crate::storage::{PersonClaim, Storage, UniqueField};

/// 生成服务结构体：惰性从 `app_data` 取得存储
macro_rules! define_service {
    ($name:ident) => {
        pub struct $name {
            storage: Option<std::sync::Arc<dyn crate::storage::Storage>>,
        }

        impl $name {
            pub fn new_lazy() -> Self {
                Self { storage: None }
            }

            pub(crate) fn get_storage(
                &self,
                request: &actix_web::HttpRequest,
            ) -> std::result::Result<std::sync::Arc<dyn crate::storage::Storage>, actix_web::HttpResponse>
            {
                crate::services::resolve_storage(&self.storage, request)
            }

            /// 存储与当前访问者
            pub(crate) fn context(
                &self,
                request: &actix_web::HttpRequest,
            ) -> std::result::Result<
                (
                    std::sync::Arc<dyn crate::storage::Storage>,
                    crate::models::users::entities::Viewer,
                ),
                actix_web::HttpResponse,
            > {
                let storage = self.get_storage(request)?;
                let viewer = crate::services::current_viewer(request)?;
                Ok((storage, viewer))
            }
        }
    };
}

pub mod announcements;
pub mod assignments;
pub mod attendance;
pub mod classes;
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

pub use announcements::AnnouncementService;
pub use assignments::AssignmentService;
pub use attendance::AttendanceService;
pub use classes::ClassService;
pub use dashboard::DashboardService;
pub use events::EventService;
pub use exams::ExamService;
pub use grades::GradeService;
pub use lessons::LessonService;
pub use parents::ParentService;
pub use results::ResultService;
pub use students::StudentService;
pub use subjects::SubjectService;
pub use system::SystemService;
pub use teachers::TeacherService;

pub(crate) fn resolve_storage(
    stored: &Option<Arc<dyn Storage>>,
    request: &HttpRequest,
) -> std::result::Result<Arc<dyn Storage>, HttpResponse> {
    if let Some(storage) = stored {
        return Ok(storage.clone());
    }
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| {
            error!("Storage not found in app data");
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                "Storage unavailable",
            ))
        })
}

pub(crate) fn current_viewer(request: &HttpRequest) -> std::result::Result<Viewer, HttpResponse> {
    RequireJWT::extract_viewer(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing user identity",
        ))
    })
}

/// 列表页大小
pub(crate) fn page_size() -> u64 {
    AppConfig::get().list.page_size
}

/// 读取结果的统一响应：失败时记录日志并返回 500
pub(crate) fn read_response<T: Serialize + TS>(what: &str, result: Result<T>) -> HttpResponse {
    match result {
        Ok(data) => HttpResponse::Ok().json(ApiResponse::success(
            data,
            format!("{what} retrieved successfully"),
        )),
        Err(e) => {
            error!("Failed to retrieve {}: {}", what, e);
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::ListFailed,
                format!("Failed to retrieve {what}"),
            ))
        }
    }
}

/// 单条记录读取：不存在或不在可见范围内时返回 404
pub(crate) fn detail_response<T: Serialize + TS>(
    what: &str,
    missing: (ErrorCode, &str),
    result: Result<Option<T>>,
) -> HttpResponse {
    match result {
        Ok(Some(data)) => HttpResponse::Ok().json(ApiResponse::success(
            data,
            format!("{what} retrieved successfully"),
        )),
        Ok(None) => HttpResponse::NotFound().json(ApiResponse::error_empty(missing.0, missing.1)),
        Err(e) => {
            error!("Failed to retrieve {}: {}", what, e);
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve {what}"),
            ))
        }
    }
}

/// 写操作响应，HTTP 状态码跟随结果
pub(crate) fn mutation_response(result: MutationResult) -> HttpResponse {
    HttpResponse::build(result.status_code()).json(result)
}

/// 删除结果：未删除任何行视为不存在
pub(crate) fn deletion(
    entity: &'static str,
    id: impl Into<RecordId>,
    not_found: &str,
    result: Result<bool>,
) -> MutationResult {
    let id = id.into();
    let outcome = result.map(|deleted| {
        if deleted {
            MutationResult::deleted(entity, id)
        } else {
            MutationResult::not_found(entity, not_found)
        }
    });
    MutationResult::settle(entity, outcome, not_found)
}

/// 人员 ID：优先使用认证服务下发的 ID，否则生成 UUID
pub(crate) fn person_id(provided: &Option<String>) -> String {
    crate::utils::validate::normalize_optional(provided)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

/// 人员写入前需要查重的字段（规范化后）
pub(crate) struct PersonFields {
    id: Option<String>,
    username: String,
    email: Option<String>,
    phone: Option<String>,
}

impl PersonFields {
    /// `creating` 为真时才检查认证服务提供的 ID
    pub(crate) fn new(provided_id: &Option<String>, profile: &ProfileInput, creating: bool) -> Self {
        Self {
            id: creating
                .then(|| crate::utils::validate::normalize_optional(provided_id))
                .flatten(),
            username: profile.username(),
            email: profile.email(),
            phone: profile.phone(),
        }
    }

    pub(crate) fn claim(&self) -> PersonClaim<'_> {
        PersonClaim {
            id: self.id.as_deref(),
            username: &self.username,
            email: self.email.as_deref(),
            phone: self.phone.as_deref(),
        }
    }
}

/// 人员唯一字段冲突
pub(crate) fn person_conflict(entity: &'static str, field: UniqueField) -> MutationResult {
    let field = match field {
        UniqueField::Id => "id",
        UniqueField::Username => "username",
        UniqueField::Email => "email",
        UniqueField::Phone => "phone",
    };
    MutationResult::conflict(entity, format!("A {entity} with this {field} already exists"))
}
