use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::students::requests::{StudentInput, StudentListParams};
use crate::models::users::entities::UserRole;
use crate::services::StudentService;
use crate::utils::SafePersonId;

// 懒加载的全局 STUDENT_SERVICE 实例
static STUDENT_SERVICE: Lazy<StudentService> = Lazy::new(StudentService::new_lazy);

// HTTP处理程序
pub async fn list_students(
    req: HttpRequest,
    query: web::Query<StudentListParams>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.list_students(&req, query.into_inner()).await
}

pub async fn get_student(req: HttpRequest, id: SafePersonId) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.get_student(&req, id.0).await
}

pub async fn create_student(
    req: HttpRequest,
    body: web::Json<StudentInput>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.create_student(&req, body.into_inner()).await
}

pub async fn update_student(
    req: HttpRequest,
    id: SafePersonId,
    body: web::Json<StudentInput>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .update_student(&req, id.0, body.into_inner())
        .await
}

pub async fn delete_student(req: HttpRequest, id: SafePersonId) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.delete_student(&req, id.0).await
}

// 配置路由
pub fn configure_students_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/students")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_students))
                    .route(
                        web::post()
                            .to(create_student)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_student))
                    .route(
                        web::put()
                            .to(update_student)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_student)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            ),
    );
}
