//! 路径参数提取器
//!
//! 非法 ID 直接返回 400 JSON 响应，处理函数只会拿到合法值。

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn bad_path(message: &str) -> actix_web::Error {
    InternalError::from_response(
        message.to_string(),
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, message)),
    )
    .into()
}

/// 自增主键路径参数 `{id}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafeIDI64(pub i64);

impl FromRequest for SafeIDI64 {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let parsed = req
            .match_info()
            .get("id")
            .and_then(|raw| raw.parse::<i64>().ok())
            .filter(|id| *id > 0);
        ready(parsed.map(SafeIDI64).ok_or_else(|| bad_path("Invalid id")))
    }
}

/// 人员 ID 路径参数 `{id}`（认证服务下发的字符串）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafePersonId(pub String);

const MAX_PERSON_ID_LEN: usize = 64;

fn is_valid_person_id(raw: &str) -> bool {
    !raw.is_empty()
        && raw.len() <= MAX_PERSON_ID_LEN
        && raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

impl FromRequest for SafePersonId {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let parsed = req
            .match_info()
            .get("id")
            .filter(|raw| is_valid_person_id(raw))
            .map(|raw| SafePersonId(raw.to_string()));
        ready(parsed.ok_or_else(|| bad_path("Invalid id")))
    }
}
