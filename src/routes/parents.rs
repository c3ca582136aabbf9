use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::parents::requests::{ParentInput, ParentListParams};
use crate::models::users::entities::UserRole;
use crate::services::ParentService;
use crate::utils::SafePersonId;

// 懒加载的全局 PARENT_SERVICE 实例
static PARENT_SERVICE: Lazy<ParentService> = Lazy::new(ParentService::new_lazy);

// HTTP处理程序
pub async fn list_parents(
    req: HttpRequest,
    query: web::Query<ParentListParams>,
) -> ActixResult<HttpResponse> {
    PARENT_SERVICE.list_parents(&req, query.into_inner()).await
}

pub async fn create_parent(
    req: HttpRequest,
    body: web::Json<ParentInput>,
) -> ActixResult<HttpResponse> {
    PARENT_SERVICE.create_parent(&req, body.into_inner()).await
}

pub async fn update_parent(
    req: HttpRequest,
    id: SafePersonId,
    body: web::Json<ParentInput>,
) -> ActixResult<HttpResponse> {
    PARENT_SERVICE
        .update_parent(&req, id.0, body.into_inner())
        .await
}

pub async fn delete_parent(req: HttpRequest, id: SafePersonId) -> ActixResult<HttpResponse> {
    PARENT_SERVICE.delete_parent(&req, id.0).await
}

// 配置路由
pub fn configure_parents_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/parents")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_parents))
                    .route(
                        web::post()
                            .to(create_parent)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(
                        web::put()
                            .to(update_parent)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_parent)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            ),
    );
}
