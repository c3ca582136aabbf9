use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::SchoolError;
use crate::models::ErrorCode;

// 统一的API响应结构
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub struct ApiResponse<T: TS> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T: TS> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error(code: ErrorCode, data: T, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }
}

impl From<&SchoolError> for ErrorCode {
    fn from(err: &SchoolError) -> Self {
        match err {
            SchoolError::Validation(_) | SchoolError::DateParse(_) => ErrorCode::ValidationFailed,
            SchoolError::NotFound(_) => ErrorCode::NotFound,
            SchoolError::Conflict(_) | SchoolError::Reference(_) => ErrorCode::Conflict,
            SchoolError::Authentication(_) => ErrorCode::Unauthorized,
            SchoolError::Authorization(_) => ErrorCode::Forbidden,
            SchoolError::DatabaseConfig(_)
            | SchoolError::DatabaseConnection(_)
            | SchoolError::DatabaseOperation(_)
            | SchoolError::Serialization(_) => ErrorCode::InternalServerError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_serializes_data() {
        let resp = ApiResponse::success(vec![1_i64, 2], "ok");
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["code"], 0);
        assert_eq!(json["data"], serde_json::json!([1, 2]));
    }

    #[test]
    fn test_empty_error_omits_data() {
        let resp = ApiResponse::error_empty(ErrorCode::NotFound, "missing");
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["code"], ErrorCode::NotFound as i32);
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_error_code_mapping() {
        assert_eq!(
            ErrorCode::from(&SchoolError::conflict("x")),
            ErrorCode::Conflict
        );
        assert_eq!(
            ErrorCode::from(&SchoolError::database_operation("x")),
            ErrorCode::InternalServerError
        );
    }
}
