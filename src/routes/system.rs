use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::services::SystemService;

static SYSTEM_SERVICE: Lazy<SystemService> = Lazy::new(SystemService::new_lazy);

pub async fn health(request: HttpRequest) -> ActixResult<HttpResponse> {
    SYSTEM_SERVICE.health(&request).await
}

// 存活探针不经过 JWT 中间件
pub fn configure_system_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/v1/health", web::get().to(health));
}
