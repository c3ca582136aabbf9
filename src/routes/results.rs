use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::results::requests::{ResultInput, ResultListParams};
use crate::models::users::entities::UserRole;
use crate::services::ResultService;
use crate::utils::SafeIDI64;

// 懒加载的全局 RESULT_SERVICE 实例
static RESULT_SERVICE: Lazy<ResultService> = Lazy::new(ResultService::new_lazy);

// HTTP处理程序
pub async fn list_results(
    req: HttpRequest,
    query: web::Query<ResultListParams>,
) -> ActixResult<HttpResponse> {
    RESULT_SERVICE.list_results(&req, query.into_inner()).await
}

pub async fn create_result(
    req: HttpRequest,
    body: web::Json<ResultInput>,
) -> ActixResult<HttpResponse> {
    RESULT_SERVICE.create_result(&req, body.into_inner()).await
}

pub async fn update_result(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<ResultInput>,
) -> ActixResult<HttpResponse> {
    RESULT_SERVICE
        .update_result(&req, id.0, body.into_inner())
        .await
}

pub async fn delete_result(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    RESULT_SERVICE.delete_result(&req, id.0).await
}

// 配置路由
pub fn configure_results_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/results")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_results))
                    .route(
                        web::post()
                            .to(create_result)
                            // 教师在自己的课程范围内操作，管理员不受限制
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(
                        web::put()
                            .to(update_result)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_result)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            ),
    );
}
