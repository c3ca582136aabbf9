/*!
 * 基于角色的访问控制中间件
 *
 * 必须在 RequireJWT 之后使用。只检查角色；行级范围（例如教师只能修改自己课程下的考试）
 * 在业务层处理。
 *
 * ```rust,ignore
 * .route(
 *     web::post()
 *         .to(create_subject)
 *         .wrap(RequireRole::new(&UserRole::Admin)),
 * )
 * .route(
 *     web::post()
 *         .to(create_exam)
 *         .wrap(RequireRole::new_any(UserRole::teacher_roles())),
 * )
 * ```
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
use tracing::info;

use crate::models::{
    ErrorCode,
    users::entities::{UserRole, Viewer},
};

use super::create_error_response;

#[derive(Clone)]
pub struct RequireRole {
    allowed_roles: Vec<UserRole>,
}

impl RequireRole {
    /// 创建需要特定角色的中间件
    pub fn new(role: &UserRole) -> Self {
        Self {
            allowed_roles: vec![*role],
        }
    }

    /// 创建需要任一角色的中间件
    pub fn new_any(roles: &[&UserRole]) -> Self {
        Self {
            allowed_roles: roles.iter().map(|r| **r).collect(),
        }
    }

    pub(crate) fn permits(&self, role: UserRole) -> bool {
        self.allowed_roles.contains(&role)
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            guard: self.clone(),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    guard: RequireRole,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
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
        let guard = self.guard.clone();

        Box::pin(async move {
            let viewer = req.extensions().get::<Viewer>().cloned();

            match viewer {
                Some(viewer) if guard.permits(viewer.role) => {
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Some(viewer) => {
                    info!(
                        "Access denied for user {} (role: {}). Allowed roles: {:?}",
                        viewer.user_id, viewer.role, guard.allowed_roles
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::FORBIDDEN,
                            ErrorCode::Forbidden,
                            "Access denied.",
                        )
                        .map_into_right_body(),
                    ))
                }
                None => {
                    info!(
                        "Role check failed: No viewer found in request. Make sure RequireJWT middleware is applied first."
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            "Authentication required",
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test, web};

    // 测试中直接写入 Viewer，代替 RequireJWT
    async fn call_as(viewer: Option<Viewer>, guard: RequireRole) -> StatusCode {
        let app = test::init_service(
            App::new().service(
                web::resource("/guarded")
                    .route(web::post().to(|| async { HttpResponse::Ok().finish() }))
                    .wrap(guard),
            ),
        )
        .await;
        let req = test::TestRequest::post().uri("/guarded").to_request();
        if let Some(viewer) = viewer {
            req.extensions_mut().insert(viewer);
        }
        test::call_service(&app, req).await.status()
    }

    #[actix_web::test]
    async fn test_admin_only() {
        let guard = RequireRole::new(&UserRole::Admin);
        assert_eq!(
            call_as(Some(Viewer::new("a1", UserRole::Admin)), guard.clone()).await,
            StatusCode::OK
        );
        assert_eq!(
            call_as(Some(Viewer::new("t1", UserRole::Teacher)), guard.clone()).await,
            StatusCode::FORBIDDEN
        );
        assert_eq!(call_as(None, guard).await, StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_teacher_roles() {
        let guard = RequireRole::new_any(UserRole::teacher_roles());
        assert!(guard.permits(UserRole::Teacher));
        assert!(guard.permits(UserRole::Admin));
        assert!(!guard.permits(UserRole::Parent));
        assert_eq!(
            call_as(Some(Viewer::new("p1", UserRole::Parent)), guard).await,
            StatusCode::FORBIDDEN
        );
    }
}
