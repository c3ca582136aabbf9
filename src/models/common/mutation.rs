//! 写操作的统一返回结构
//!
//! 预期内的失败（校验、重名、不存在）都通过 `success: false` 表达，不会作为故障抛出。

use actix_web::http::StatusCode;
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::error;

use crate::errors::SchoolError;
use crate::utils::validate::FieldErrors;

pub const GENERIC_FAILURE: &str = "Something went wrong, please try again";
pub const VALIDATION_FAILED: &str = "Validation failed";

/// 记录主键：人员使用认证服务下发的字符串 ID，其余为自增整数
#[derive(Debug, Clone, PartialEq)]
pub enum RecordId {
    Int(i64),
    Person(String),
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        RecordId::Int(id)
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        RecordId::Person(id)
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RecordId::Int(id) => serializer.serialize_i64(*id),
            RecordId::Person(id) => serializer.serialize_str(id),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
    Created(RecordId),
    Updated(RecordId),
    Deleted(RecordId),
    Invalid(FieldErrors),
    NotFound(String),
    Conflict(String),
    Failed,
}

/// 写操作结果，序列化为 `{success, error?, fieldErrors?, <entity>Id?}`
#[derive(Debug, Clone, PartialEq)]
pub struct MutationResult {
    entity: &'static str,
    pub outcome: MutationOutcome,
}

impl MutationResult {
    pub fn new(entity: &'static str, outcome: MutationOutcome) -> Self {
        Self { entity, outcome }
    }

    pub fn created(entity: &'static str, id: impl Into<RecordId>) -> Self {
        Self::new(entity, MutationOutcome::Created(id.into()))
    }

    pub fn updated(entity: &'static str, id: impl Into<RecordId>) -> Self {
        Self::new(entity, MutationOutcome::Updated(id.into()))
    }

    pub fn deleted(entity: &'static str, id: impl Into<RecordId>) -> Self {
        Self::new(entity, MutationOutcome::Deleted(id.into()))
    }

    pub fn invalid(entity: &'static str, errors: FieldErrors) -> Self {
        Self::new(entity, MutationOutcome::Invalid(errors))
    }

    pub fn not_found(entity: &'static str, message: impl Into<String>) -> Self {
        Self::new(entity, MutationOutcome::NotFound(message.into()))
    }

    pub fn conflict(entity: &'static str, message: impl Into<String>) -> Self {
        Self::new(entity, MutationOutcome::Conflict(message.into()))
    }

    /// 将存储层错误转换为结果；非预期错误写入日志并返回通用提示
    pub fn from_error(entity: &'static str, err: SchoolError, conflict_message: &str) -> Self {
        match err {
            SchoolError::NotFound(msg) => Self::not_found(entity, msg),
            SchoolError::Conflict(_) => Self::conflict(entity, conflict_message),
            SchoolError::Reference(_) => Self::conflict(
                entity,
                format!("This {entity} is still referenced by other records"),
            ),
            other => {
                error!("Unexpected failure while saving {}: {}", entity, other);
                Self::new(entity, MutationOutcome::Failed)
            }
        }
    }

    /// 汇总一次写操作：`Ok` 原样返回，`Err` 按 [`Self::from_error`] 转换
    pub fn settle(
        entity: &'static str,
        result: crate::errors::Result<Self>,
        conflict_message: &str,
    ) -> Self {
        result.unwrap_or_else(|err| Self::from_error(entity, err, conflict_message))
    }

    pub fn success(&self) -> bool {
        matches!(
            self.outcome,
            MutationOutcome::Created(_) | MutationOutcome::Updated(_) | MutationOutcome::Deleted(_)
        )
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            MutationOutcome::Invalid(_) => Some(VALIDATION_FAILED),
            MutationOutcome::NotFound(msg) | MutationOutcome::Conflict(msg) => Some(msg),
            MutationOutcome::Failed => Some(GENERIC_FAILURE),
            _ => None,
        }
    }

    pub fn id(&self) -> Option<&RecordId> {
        match &self.outcome {
            MutationOutcome::Created(id)
            | MutationOutcome::Updated(id)
            | MutationOutcome::Deleted(id) => Some(id),
            _ => None,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self.outcome {
            MutationOutcome::Created(_) => StatusCode::CREATED,
            MutationOutcome::Updated(_) | MutationOutcome::Deleted(_) => StatusCode::OK,
            MutationOutcome::Invalid(_) => StatusCode::BAD_REQUEST,
            MutationOutcome::NotFound(_) => StatusCode::NOT_FOUND,
            MutationOutcome::Conflict(_) => StatusCode::CONFLICT,
            MutationOutcome::Failed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl Serialize for MutationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("success", &self.success())?;
        if let Some(error) = self.error() {
            map.serialize_entry("error", error)?;
        }
        if let MutationOutcome::Invalid(errors) = &self.outcome {
            map.serialize_entry("fieldErrors", errors)?;
        }
        if let Some(id) = self.id() {
            map.serialize_entry(&format!("{}Id", self.entity), id)?;
        }
        map.end()
    }
}
