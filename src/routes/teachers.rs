use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::teachers::requests::{TeacherInput, TeacherListParams};
use crate::models::users::entities::UserRole;
use crate::services::TeacherService;
use crate::utils::SafePersonId;

// 懒加载的全局 TEACHER_SERVICE 实例
static TEACHER_SERVICE: Lazy<TeacherService> = Lazy::new(TeacherService::new_lazy);

// HTTP处理程序
pub async fn list_teachers(
    req: HttpRequest,
    query: web::Query<TeacherListParams>,
) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.list_teachers(&req, query.into_inner()).await
}

pub async fn get_teacher(req: HttpRequest, id: SafePersonId) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.get_teacher(&req, id.0).await
}

pub async fn list_teacher_names(req: HttpRequest) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.list_names(&req).await
}

pub async fn create_teacher(
    req: HttpRequest,
    body: web::Json<TeacherInput>,
) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.create_teacher(&req, body.into_inner()).await
}

pub async fn update_teacher(
    req: HttpRequest,
    id: SafePersonId,
    body: web::Json<TeacherInput>,
) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE
        .update_teacher(&req, id.0, body.into_inner())
        .await
}

pub async fn delete_teacher(req: HttpRequest, id: SafePersonId) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.delete_teacher(&req, id.0).await
}

// 配置路由
pub fn configure_teachers_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/teachers")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_teachers))
                    .route(
                        web::post()
                            .to(create_teacher)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            // 先于 /{id} 注册
            .service(web::resource("/names").route(web::get().to(list_teacher_names)))
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_teacher))
                    .route(
                        web::put()
                            .to(update_teacher)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_teacher)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            ),
    );
}
