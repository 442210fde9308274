pub mod auth_controller;
pub mod user_controller;

use crate::services::Services;
use axum::{routing::get, Extension, Json, Router};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::sync::Arc;
use utils::AppConfig;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "OK")]
    pub status: String,
    pub message: String,
    /// RFC3339 时间戳
    pub timestamp: String,
    #[schema(example = "development")]
    pub environment: String,
}

/// 系统健康检查
///
/// 返回服务器运行状态
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "服务器运行正常", body = HealthResponse)
    ),
    tag = "系统状态"
)]
pub async fn health(Extension(config): Extension<Arc<AppConfig>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        message: "Server is running".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        environment: config.cargo_env.as_str().to_string(),
    })
}

pub fn app(services: Services) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/auth", auth_controller::AuthController::app())
        .nest("/user", user_controller::UserController::app(services.clone()))
        .nest("/users", user_controller::UserController::app(services))
}
