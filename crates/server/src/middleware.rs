use crate::auth::rate_limit::extract_client_ip;
use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::info;

/// 简化版本的IP记录中间件，只记录IP和基本信息
pub async fn simple_ip_logger(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let client_ip = extract_client_ip(&request);
    let start = Instant::now();

    // 记录请求IP
    info!("📍 API请求 - IP: {} | {} {}", client_ip, method, path);

    let response = next.run(request).await;

    info!(
        "✅ 请求完成 - IP: {} | {} {} | 状态: {} | 耗时: {:.2}ms",
        client_ip,
        method,
        path,
        response.status().as_u16(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    response
}
