pub mod auth_service;
pub mod user_service;

use crate::auth::AuthConfig;
use auth_service::{AuthService, DynAuthService};
use database::{Database, DynUserRepository};
use std::sync::Arc;
use tracing::info;
use user_service::{DynUserService, UserService};

#[derive(Clone)]
pub struct Services {
    pub auth: DynAuthService,
    pub user: DynUserService,
}

impl Services {
    pub fn new(db: Database, config: &AuthConfig) -> Self {
        Self::with_repository(Arc::new(db), config)
    }

    /// 使用任意仓储实现构建服务（测试中注入内存仓储）
    pub fn with_repository(repository: DynUserRepository, config: &AuthConfig) -> Self {
        let auth = Arc::new(AuthService::new(repository.clone(), config)) as DynAuthService;
        let user = Arc::new(UserService::new(repository)) as DynUserService;

        info!("🧠 initializing services...");

        Self { auth, user }
    }
}
