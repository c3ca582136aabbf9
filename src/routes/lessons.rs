use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::lessons::requests::{LessonInput, LessonListParams, ScheduleParams};
use crate::models::users::entities::UserRole;
use crate::services::LessonService;
use crate::utils::SafeIDI64;

// 懒加载的全局 LESSON_SERVICE 实例
static LESSON_SERVICE: Lazy<LessonService> = Lazy::new(LessonService::new_lazy);

// HTTP处理程序
pub async fn list_lessons(
    req: HttpRequest,
    query: web::Query<LessonListParams>,
) -> ActixResult<HttpResponse> {
    LESSON_SERVICE.list_lessons(&req, query.into_inner()).await
}

pub async fn schedule(
    req: HttpRequest,
    query: web::Query<ScheduleParams>,
) -> ActixResult<HttpResponse> {
    LESSON_SERVICE.schedule(&req, query.into_inner()).await
}

pub async fn create_lesson(
    req: HttpRequest,
    body: web::Json<LessonInput>,
) -> ActixResult<HttpResponse> {
    LESSON_SERVICE.create_lesson(&req, body.into_inner()).await
}

pub async fn update_lesson(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<LessonInput>,
) -> ActixResult<HttpResponse> {
    LESSON_SERVICE
        .update_lesson(&req, id.0, body.into_inner())
        .await
}

pub async fn delete_lesson(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    LESSON_SERVICE.delete_lesson(&req, id.0).await
}

// 配置路由
pub fn configure_lessons_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/lessons")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_lessons))
                    .route(
                        web::post()
                            .to(create_lesson)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(
                        web::put()
                            .to(update_lesson)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_lesson)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            ),
    );
}

// 日历课表
pub fn configure_schedule_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/schedule")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(schedule)),
    );
}
