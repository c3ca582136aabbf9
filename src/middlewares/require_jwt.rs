/*!
 * JWT 认证中间件
 *
 * 验证认证服务签发的 Bearer 令牌，并把访问者身份（用户 ID 与角色）写入请求扩展。
 * 令牌中的 `sub` 与 `role` 在签名和过期时间校验通过后直接采信，不再回查数据库。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use actix_web::{web, App, HttpServer};
 * use crate::middlewares::RequireJWT;
 *
 * HttpServer::new(|| {
 *     App::new()
 *         .service(
 *             web::scope("/api/v1/teachers")
 *                 .wrap(RequireJWT)
 *                 .route("", web::get().to(list_teachers))
 *         )
 * })
 * ```
 *
 * 在处理程序中读取访问者：
 *
 * ```rust,ignore
 * async fn handler(req: HttpRequest) -> Result<HttpResponse> {
 *     let viewer = RequireJWT::extract_viewer(&req);
 *     // ...
 * }
 * ```
 *
 * ## 认证流程
 *
 * 1. 客户端在请求头中包含 `Authorization: Bearer <JWT_TOKEN>`
 * 2. 中间件校验签名（HS256）、过期时间与角色
 * 3. 校验通过则写入 `Viewer` 并继续处理请求，否则返回 401
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::{debug, info};

use super::create_error_response;
use crate::config::AppConfig;
use crate::models::ErrorCode;
use crate::models::users::entities::{UserRole, Viewer};
use crate::utils::jwt::JwtUtils;

const BEARER_PREFIX: &str = "Bearer ";
const AUTHORIZATION_HEADER: &str = "Authorization";

#[derive(Clone)]
pub struct RequireJWT;

/// 从 Authorization 头解析访问者
pub(crate) fn resolve_viewer(
    header: Option<&str>,
    secret: &str,
    leeway: u64,
) -> Result<Viewer, String> {
    let token = header
        .and_then(|h| h.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| "Missing or invalid Authorization header".to_string())?;

    let claims = JwtUtils::verify_with_secret(token, secret, leeway).map_err(|err| {
        info!("JWT token validation failed: {}", err);
        "Invalid JWT token".to_string()
    })?;

    if claims.sub.trim().is_empty() {
        return Err("Invalid user ID in JWT".to_string());
    }

    let role = claims
        .role
        .parse::<UserRole>()
        .map_err(|_| format!("Unknown role in JWT: {}", claims.role))?;

    Ok(Viewer::new(claims.sub, role))
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 处理 OPTIONS 预检请求
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            let config = AppConfig::get();
            let header = req
                .headers()
                .get(AUTHORIZATION_HEADER)
                .and_then(|h| h.to_str().ok());

            match resolve_viewer(header, &config.jwt.secret, config.jwt.leeway) {
                Ok(viewer) => {
                    debug!(
                        "JWT authentication successful for {} ({})",
                        viewer.user_id, viewer.role
                    );
                    req.extensions_mut().insert(viewer);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(err) => {
                    info!(
                        "JWT authentication failed for request to {}: {}",
                        req.path(),
                        err
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            &format!("Unauthorized: {err}"),
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

// 辅助函数：从请求中提取访问者信息
impl RequireJWT {
    /// 从请求扩展中提取访问者
    /// 此函数应该在应用了RequireJWT中间件的路由处理程序中使用
    pub fn extract_viewer(req: &actix_web::HttpRequest) -> Option<Viewer> {
        req.extensions().get::<Viewer>().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    fn bearer(sub: &str, role: &str, secret: &str) -> String {
        let token =
            JwtUtils::generate_with_secret(sub, role, chrono::Duration::minutes(10), secret)
                .unwrap();
        format!("Bearer {token}")
    }

    #[test]
    fn test_valid_token_yields_viewer() {
        let header = bearer("user_t1", "teacher", SECRET);
        let viewer = resolve_viewer(Some(&header), SECRET, 0).unwrap();
        assert_eq!(viewer, Viewer::new("user_t1", UserRole::Teacher));
    }

    #[test]
    fn test_missing_header() {
        assert!(resolve_viewer(None, SECRET, 0).is_err());
        assert!(resolve_viewer(Some("Token abc"), SECRET, 0).is_err());
    }

    #[test]
    fn test_bad_signature() {
        let header = bearer("user_t1", "teacher", "another-secret");
        assert_eq!(
            resolve_viewer(Some(&header), SECRET, 0),
            Err("Invalid JWT token".to_string())
        );
    }

    #[test]
    fn test_unknown_role() {
        let header = bearer("user_t1", "janitor", SECRET);
        let err = resolve_viewer(Some(&header), SECRET, 0).unwrap_err();
        assert!(err.contains("Unknown role"));
    }
}
