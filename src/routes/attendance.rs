use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::attendance::requests::{AttendanceInput, AttendanceListParams};
use crate::models::users::entities::UserRole;
use crate::services::AttendanceService;
use crate::utils::SafeIDI64;

// 懒加载的全局 ATTENDANCE_SERVICE 实例
static ATTENDANCE_SERVICE: Lazy<AttendanceService> = Lazy::new(AttendanceService::new_lazy);

// HTTP处理程序
pub async fn list_attendance(
    req: HttpRequest,
    query: web::Query<AttendanceListParams>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.list_attendance(&req, query.into_inner()).await
}

pub async fn create_attendance(
    req: HttpRequest,
    body: web::Json<AttendanceInput>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.create_attendance(&req, body.into_inner()).await
}

pub async fn update_attendance(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<AttendanceInput>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .update_attendance(&req, id.0, body.into_inner())
        .await
}

pub async fn delete_attendance(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.delete_attendance(&req, id.0).await
}

// 配置路由
pub fn configure_attendance_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/attendance")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_attendance))
                    .route(
                        web::post()
                            .to(create_attendance)
                            // 教师在自己的课程范围内操作，管理员不受限制
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(
                        web::put()
                            .to(update_attendance)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_attendance)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            ),
    );
}
