use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::subjects::requests::{SubjectInput, SubjectListParams};
use crate::models::users::entities::UserRole;
use crate::services::SubjectService;
use crate::utils::SafeIDI64;

// 懒加载的全局 SUBJECT_SERVICE 实例
static SUBJECT_SERVICE: Lazy<SubjectService> = Lazy::new(SubjectService::new_lazy);

// HTTP处理程序
pub async fn list_subjects(
    req: HttpRequest,
    query: web::Query<SubjectListParams>,
) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE.list_subjects(&req, query.into_inner()).await
}

pub async fn list_subject_names(req: HttpRequest) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE.list_names(&req).await
}

pub async fn create_subject(
    req: HttpRequest,
    body: web::Json<SubjectInput>,
) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE.create_subject(&req, body.into_inner()).await
}

pub async fn update_subject(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<SubjectInput>,
) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE
        .update_subject(&req, id.0, body.into_inner())
        .await
}

pub async fn delete_subject(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE.delete_subject(&req, id.0).await
}

// 配置路由
pub fn configure_subjects_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/subjects")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_subjects))
                    .route(
                        web::post()
                            .to(create_subject)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            // 先于 /{id} 注册
            .service(web::resource("/names").route(web::get().to(list_subject_names)))
            .service(
                web::resource("/{id}")
                    .route(
                        web::put()
                            .to(update_subject)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_subject)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            ),
    );
}
