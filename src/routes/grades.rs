use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::grades::requests::GradeInput;
use crate::models::users::entities::UserRole;
use crate::services::GradeService;

static GRADE_SERVICE: Lazy<GradeService> = Lazy::new(GradeService::new_lazy);

pub async fn list_grades(req: HttpRequest) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.list_grades(&req).await
}

pub async fn create_grade(
    req: HttpRequest,
    body: web::Json<GradeInput>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.create_grade(&req, body.into_inner()).await
}

// 配置路由
pub fn configure_grades_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/grades")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_grades))
                    .route(
                        web::post()
                            .to(create_grade)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            ),
    );
}
