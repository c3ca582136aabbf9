use crate::storage::Storage;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
}

/// 按环境变量登记初始管理员
///
/// 身份由外部认证服务签发，这里只保证 `ADMIN_ID` 对应的管理员记录存在。
async fn seed_admin(storage: &Arc<dyn Storage>) {
    let Ok(id) = std::env::var("ADMIN_ID") else {
        debug!("ADMIN_ID not set, skipping admin seed");
        return;
    };
    let id = id.trim().to_string();
    if id.is_empty() {
        return;
    }
    let username = std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());

    match storage.ensure_admin(&id, username.trim()).await {
        Ok(true) => info!("Admin account {} registered", id),
        Ok(false) => debug!("Admin account {} already present", id),
        Err(e) => warn!("Failed to register admin account: {}", e),
    }
}

/// 准备服务器启动的上下文
pub async fn prepare_server_startup() -> StartupContext {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    seed_admin(&storage).await;

    StartupContext { storage }
}
