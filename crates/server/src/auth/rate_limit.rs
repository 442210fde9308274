use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};
use tokio::sync::RwLock;
use tracing::{debug, warn};
use utils::{AppConfig, AppError};

pub const RATE_LIMIT_MESSAGE: &str = "Too many requests from this IP, please try again later.";

/// 速率限制配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// 窗口内允许的请求数
    pub max_requests: u32,
    /// 窗口长度（秒）
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window_secs: 15 * 60,
        }
    }
}

impl From<&AppConfig> for RateLimitConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            max_requests: config.rate_limit_max_requests,
            window_secs: config.rate_limit_window_secs.max(1),
        }
    }
}

impl RateLimitConfig {
    pub fn get_window_start(&self, timestamp: u64) -> u64 {
        (timestamp / self.window_secs) * self.window_secs
    }
}

/// 速率限制记录
#[derive(Debug, Clone)]
pub struct RateLimitRecord {
    pub count: u32,
    pub window_start: u64,
    pub last_request: u64,
}

/// 速率限制结果
#[derive(Debug, Clone)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub count: u32,
    pub limit: u32,
    pub reset_time: u64,
}

impl RateLimitResult {
    pub fn retry_after(&self, now: u64) -> u64 {
        self.reset_time.saturating_sub(now).max(1)
    }
}

/// 内存速率限制存储，按客户端IP计数
type MemoryStore = Arc<RwLock<HashMap<String, RateLimitRecord>>>;

/// 固定窗口的IP速率限制服务
#[derive(Clone)]
pub struct RateLimitService {
    config: RateLimitConfig,
    memory_store: MemoryStore,
}

impl RateLimitService {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            memory_store: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn check_rate_limit(&self, client_ip: &str) -> RateLimitResult {
        self.check_at(client_ip, current_timestamp()).await
    }

    async fn check_at(&self, client_ip: &str, current_time: u64) -> RateLimitResult {
        let window_start = self.config.get_window_start(current_time);
        let reset_time = window_start + self.config.window_secs;
        let limit = self.config.max_requests;

        let mut store = self.memory_store.write().await;

        let record = store.entry(client_ip.to_string()).or_insert(RateLimitRecord {
            count: 0,
            window_start,
            last_request: current_time,
        });

        // 窗口已经滚动，重置计数
        if record.window_start < window_start {
            record.count = 0;
            record.window_start = window_start;
        }

        record.last_request = current_time;

        if record.count >= limit {
            return RateLimitResult {
                allowed: false,
                count: record.count,
                limit,
                reset_time,
            };
        }

        record.count += 1;

        RateLimitResult {
            allowed: true,
            count: record.count,
            limit,
            reset_time,
        }
    }

    /// 清理超过一个窗口未活动的记录
    pub async fn cleanup(&self) -> usize {
        let current_time = current_timestamp();
        let window = self.config.window_secs;

        let mut store = self.memory_store.write().await;
        let before = store.len();
        store.retain(|_, record| current_time.saturating_sub(record.last_request) < window);
        before - store.len()
    }

    /// 启动内存清理任务
    pub fn start_memory_cleanup(&self) {
        let service = self.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tokio::time::Duration::from_secs(300));

            loop {
                interval.tick().await;
                let removed = service.cleanup().await;
                if removed > 0 {
                    debug!("🧹 Rate limit store cleaned up {} stale entries", removed);
                }
            }
        });
    }
}

/// IP 速率限制中间件
pub async fn rate_limit_middleware(State(service): State<RateLimitService>, request: Request, next: Next) -> Response {
    let client_ip = extract_client_ip(&request);
    let result = service.check_rate_limit(&client_ip).await;

    if !result.allowed {
        warn!(
            "🚫 Rate limit exceeded for IP: {} ({}/{}) | Path: {}",
            client_ip,
            result.count,
            result.limit,
            request.uri().path()
        );

        let mut response = AppError::TooManyRequests(RATE_LIMIT_MESSAGE.to_string()).into_response();
        if let Ok(value) = HeaderValue::from_str(&result.retry_after(current_timestamp()).to_string()) {
            response.headers_mut().insert(header::RETRY_AFTER, value);
        }
        return response;
    }

    next.run(request).await
}

/// 提取客户端IP地址
pub fn extract_client_ip(request: &Request) -> String {
    // 尝试从X-Forwarded-For头部获取真实IP
    if let Some(forwarded_for) = request.headers().get("x-forwarded-for") {
        if let Ok(forwarded_str) = forwarded_for.to_str() {
            if let Some(first_ip) = forwarded_str.split(',').next() {
                let first_ip = first_ip.trim();
                if !first_ip.is_empty() {
                    return first_ip.to_string();
                }
            }
        }
    }

    // 尝试从X-Real-IP头部获取
    if let Some(real_ip) = request.headers().get("x-real-ip") {
        if let Ok(ip_str) = real_ip.to_str() {
            return ip_str.trim().to_string();
        }
    }

    // 使用连接信息中的IP
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|connect_info| connect_info.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[tokio::test]
    async fn test_memory_rate_limit_service() {
        let service = RateLimitService::new(RateLimitConfig {
            max_requests: 2,
            window_secs: 60,
        });
        let now = 1_640_995_200; // 2022-01-01 00:00:00 UTC

        // 第一次请求应该通过
        let result1 = service.check_at("127.0.0.1", now).await;
        assert!(result1.allowed);
        assert_eq!(result1.count, 1);

        // 第二次请求应该通过
        let result2 = service.check_at("127.0.0.1", now + 1).await;
        assert!(result2.allowed);
        assert_eq!(result2.count, 2);

        // 第三次请求应该被限制
        let result3 = service.check_at("127.0.0.1", now + 2).await;
        assert!(!result3.allowed);
        assert_eq!(result3.count, 2);
        assert_eq!(result3.reset_time, now + 60);
        assert_eq!(result3.retry_after(now + 2), 58);

        // 其他IP不受影响
        assert!(service.check_at("10.0.0.1", now + 2).await.allowed);

        // 下一个窗口重新计数
        let result4 = service.check_at("127.0.0.1", now + 60).await;
        assert!(result4.allowed);
        assert_eq!(result4.count, 1);
    }

    #[test]
    fn test_time_window_calculations() {
        let config = RateLimitConfig::default();
        let timestamp = 1_640_995_200;
        assert_eq!(config.get_window_start(timestamp + 30), timestamp);
        assert_eq!(config.get_window_start(timestamp + 900), timestamp + 900);
    }

    #[test]
    fn test_config_from_app_config() {
        let config = RateLimitConfig::from(&AppConfig::new_for_test());
        assert_eq!(config, RateLimitConfig::default());
    }

    #[test]
    fn test_extract_client_ip() {
        let request = Request::builder()
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .body(Body::empty())
            .unwrap();
        assert_eq!(extract_client_ip(&request), "203.0.113.7");

        let request = Request::builder()
            .header("x-real-ip", "198.51.100.2")
            .body(Body::empty())
            .unwrap();
        assert_eq!(extract_client_ip(&request), "198.51.100.2");

        let mut request = Request::builder().body(Body::empty()).unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([192, 0, 2, 1], 4000))));
        assert_eq!(extract_client_ip(&request), "192.0.2.1");

        let request = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(extract_client_ip(&request), "unknown");
    }
}
