use crate::{
    api,
    auth::{rate_limit_middleware, RateLimitService},
    docs::ApiDoc,
    middleware,
    services::Services,
};
use axum::{
    error_handling::HandleErrorLayer,
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware::{self as axum_middleware},
    response::{IntoResponse, Response},
    BoxError, Extension, Router,
};
use std::{sync::Arc, time::Duration};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::error;
use utils::{AppConfig, AppError};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub const ROUTE_NOT_FOUND: &str = "Route not found";

pub struct AppRouter;

impl AppRouter {
    pub fn new(services: Services, config: Arc<AppConfig>, rate_limiter: RateLimitService) -> Router {
        let timeout_secs = config.http_timeout_secs;

        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

        Router::new()
            // API 路由
            .nest("/api", api::app(services.clone()))
            // Swagger UI 路由 - 包含 OpenAPI JSON 端点
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
            .fallback(Self::handle_404)
            // 添加速率限制中间件
            .layer(axum_middleware::from_fn_with_state(rate_limiter, rate_limit_middleware))
            // 添加IP日志中间件
            .layer(axum_middleware::from_fn(middleware::simple_ip_logger))
            .layer(DefaultBodyLimit::max(config.body_limit_bytes))
            .layer(CompressionLayer::new())
            // 安全响应头
            .layer(SetResponseHeaderLayer::if_not_present(
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                header::X_FRAME_OPTIONS,
                HeaderValue::from_static("SAMEORIGIN"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                header::REFERRER_POLICY,
                HeaderValue::from_static("no-referrer"),
            ))
            .layer(cors)
            .layer(
                ServiceBuilder::new()
                    .layer(Extension(services))
                    .layer(Extension(config))
                    .layer(TraceLayer::new_for_http())
                    .layer(HandleErrorLayer::new(move |err: BoxError| async move {
                        Self::handle_timeout_error(err, timeout_secs)
                    }))
                    .timeout(Duration::from_secs(timeout_secs)),
            )
    }

    async fn handle_404() -> Response {
        AppError::NotFound(ROUTE_NOT_FOUND.to_string()).into_response()
    }

    fn handle_timeout_error(err: BoxError, timeout_secs: u64) -> Response {
        if err.is::<tower::timeout::error::Elapsed>() {
            AppError::RequestTimeout(format!(
                "Request took longer than the configured {} second timeout",
                timeout_secs
            ))
            .into_response()
        } else {
            error!("❌ Unhandled internal error: {}", err);
            AppError::InternalServerErrorWithContext(err.to_string()).into_response()
        }
    }
}
