use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use crate::config::AppConfig;
use crate::models::{ApiResponse, AppStartTime, system::responses::HealthStatus};

pub struct SystemService;

impl SystemService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    // 存活探针，不需要认证
    pub async fn health(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let config = self.get_config();
        let now = chrono::Utc::now();
        let uptime_seconds = request
            .app_data::<web::Data<AppStartTime>>()
            .map(|start| (now - start.start_datetime).num_seconds())
            .unwrap_or_default();

        Ok(HttpResponse::Ok().json(ApiResponse::success(
            HealthStatus {
                status: "ok".to_string(),
                system_name: config.app.system_name.clone(),
                environment: config.app.environment.clone(),
                uptime_seconds,
            },
            "Service is healthy",
        )))
    }
}
