use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::exams::requests::{ExamInput, ExamListParams};
use crate::models::users::entities::UserRole;
use crate::services::ExamService;
use crate::utils::SafeIDI64;

// 懒加载的全局 EXAM_SERVICE 实例
static EXAM_SERVICE: Lazy<ExamService> = Lazy::new(ExamService::new_lazy);

// HTTP处理程序
pub async fn list_exams(
    req: HttpRequest,
    query: web::Query<ExamListParams>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.list_exams(&req, query.into_inner()).await
}

pub async fn create_exam(
    req: HttpRequest,
    body: web::Json<ExamInput>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.create_exam(&req, body.into_inner()).await
}

pub async fn update_exam(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<ExamInput>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE
        .update_exam(&req, id.0, body.into_inner())
        .await
}

pub async fn delete_exam(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.delete_exam(&req, id.0).await
}

// 配置路由
pub fn configure_exams_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/exams")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_exams))
                    .route(
                        web::post()
                            .to(create_exam)
                            // 教师在自己的课程范围内操作，管理员不受限制
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(
                        web::put()
                            .to(update_exam)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_exam)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            ),
    );
}
