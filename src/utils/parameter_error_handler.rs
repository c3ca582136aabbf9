use actix_web::{
    HttpRequest, HttpResponse,
    error::{InternalError, JsonPayloadError, QueryPayloadError},
};
use tracing::debug;

use crate::models::{ApiResponse, ErrorCode};

// 查询参数解析失败时返回统一的 400 响应
pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!("Invalid query string on {}: {}", req.path(), err);
    let message = format!("Invalid query parameters: {err}");
    let response =
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, &message));
    InternalError::from_response(err, response).into()
}

// 请求体 JSON 解析失败时返回统一的 400 响应
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!("Invalid JSON body on {}: {}", req.path(), err);
    let message = match &err {
        JsonPayloadError::ContentType => "Content-Type must be application/json".to_string(),
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            "Request body is too large".to_string()
        }
        other => format!("Invalid request body: {other}"),
    };
    let response =
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, &message));
    InternalError::from_response(err, response).into()
}
