use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::classes::requests::{ClassInput, ClassListParams};
use crate::models::users::entities::UserRole;
use crate::services::ClassService;
use crate::utils::SafeIDI64;

// 懒加载的全局 CLASS_SERVICE 实例
static CLASS_SERVICE: Lazy<ClassService> = Lazy::new(ClassService::new_lazy);

// HTTP处理程序
pub async fn list_classes(
    req: HttpRequest,
    query: web::Query<ClassListParams>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.list_classes(&req, query.into_inner()).await
}

pub async fn create_class(
    req: HttpRequest,
    body: web::Json<ClassInput>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.create_class(&req, body.into_inner()).await
}

pub async fn update_class(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<ClassInput>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .update_class(&req, id.0, body.into_inner())
        .await
}

pub async fn delete_class(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.delete_class(&req, id.0).await
}

// 配置路由
pub fn configure_classes_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/classes")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_classes))
                    .route(
                        web::post()
                            .to(create_class)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(
                        web::put()
                            .to(update_class)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_class)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            ),
    );
}
