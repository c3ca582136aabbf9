use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::assignments::requests::{AssignmentInput, AssignmentListParams};
use crate::models::users::entities::UserRole;
use crate::services::AssignmentService;
use crate::utils::SafeIDI64;

// 懒加载的全局 ASSIGNMENT_SERVICE 实例
static ASSIGNMENT_SERVICE: Lazy<AssignmentService> = Lazy::new(AssignmentService::new_lazy);

// HTTP处理程序
pub async fn list_assignments(
    req: HttpRequest,
    query: web::Query<AssignmentListParams>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.list_assignments(&req, query.into_inner()).await
}

pub async fn create_assignment(
    req: HttpRequest,
    body: web::Json<AssignmentInput>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.create_assignment(&req, body.into_inner()).await
}

pub async fn update_assignment(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<AssignmentInput>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .update_assignment(&req, id.0, body.into_inner())
        .await
}

pub async fn delete_assignment(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.delete_assignment(&req, id.0).await
}

// 配置路由
pub fn configure_assignments_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/assignments")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_assignments))
                    .route(
                        web::post()
                            .to(create_assignment)
                            // 教师在自己的课程范围内操作，管理员不受限制
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(
                        web::put()
                            .to(update_assignment)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_assignment)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            ),
    );
}
