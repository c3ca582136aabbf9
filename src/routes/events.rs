use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::events::requests::{EventInput, EventListParams};
use crate::models::users::entities::UserRole;
use crate::services::EventService;
use crate::utils::SafeIDI64;

// 懒加载的全局 EVENT_SERVICE 实例
static EVENT_SERVICE: Lazy<EventService> = Lazy::new(EventService::new_lazy);

// HTTP处理程序
pub async fn list_events(
    req: HttpRequest,
    query: web::Query<EventListParams>,
) -> ActixResult<HttpResponse> {
    EVENT_SERVICE.list_events(&req, query.into_inner()).await
}

pub async fn create_event(
    req: HttpRequest,
    body: web::Json<EventInput>,
) -> ActixResult<HttpResponse> {
    EVENT_SERVICE.create_event(&req, body.into_inner()).await
}

pub async fn update_event(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<EventInput>,
) -> ActixResult<HttpResponse> {
    EVENT_SERVICE
        .update_event(&req, id.0, body.into_inner())
        .await
}

pub async fn delete_event(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    EVENT_SERVICE.delete_event(&req, id.0).await
}

// 配置路由
pub fn configure_events_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/events")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_events))
                    .route(
                        web::post()
                            .to(create_event)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(
                        web::put()
                            .to(update_event)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_event)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            ),
    );
}
