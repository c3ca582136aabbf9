use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::events::requests::EventsOnDateParams;
use crate::models::users::entities::UserRole;
use crate::services::DashboardService;

// 懒加载的全局 DASHBOARD_SERVICE 实例
static DASHBOARD_SERVICE: Lazy<DashboardService> = Lazy::new(DashboardService::new_lazy);

pub async fn counts(req: HttpRequest) -> ActixResult<HttpResponse> {
    DASHBOARD_SERVICE.counts(&req).await
}

pub async fn students_by_sex(req: HttpRequest) -> ActixResult<HttpResponse> {
    DASHBOARD_SERVICE.students_by_sex(&req).await
}

pub async fn attendance_week(req: HttpRequest) -> ActixResult<HttpResponse> {
    DASHBOARD_SERVICE.attendance_week(&req).await
}

pub async fn events_on(
    req: HttpRequest,
    query: web::Query<EventsOnDateParams>,
) -> ActixResult<HttpResponse> {
    DASHBOARD_SERVICE.events_on(&req, query.into_inner()).await
}

// 配置路由
pub fn configure_dashboard_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/dashboard")
            .wrap(middlewares::RequireJWT)
            // 日历活动对所有角色开放，按可见范围过滤
            .route("/events", web::get().to(events_on))
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .route("/counts", web::get().to(counts))
                    .route("/students-by-sex", web::get().to(students_by_sex))
                    .route("/attendance-week", web::get().to(attendance_week)),
            ),
    );
}
