#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use database::{User, UserRepositoryTrait};
use mongodb::bson::oid::ObjectId;
use serde_json::Value;
use server::{
    auth::{AuthConfig, RateLimitConfig, RateLimitService},
    router::AppRouter,
    services::Services,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceExt;
use utils::{AppConfig, AppError, AppResult};

/// 内存版用户仓储，模拟 users 集合上的唯一索引
#[derive(Default)]
pub struct MemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl MemoryUserRepository {
    pub async fn insert(&self, user: User) -> User {
        self.create_user(user).await.expect("insert user")
    }

    pub async fn find_by_email(&self, email: &str) -> Option<User> {
        self.users.read().await.iter().find(|u| u.email == email).cloned()
    }

    pub async fn set_active(&self, email: &str, active: bool) {
        let mut users = self.users.write().await;
        if let Some(user) = users.iter_mut().find(|u| u.email == email) {
            user.is_active = active;
        }
    }

    pub async fn remove(&self, email: &str) {
        self.users.write().await.retain(|u| u.email != email);
    }

    pub async fn count(&self) -> usize {
        self.users.read().await.len()
    }
}

fn conflicts(existing: &User, candidate: &User) -> bool {
    existing.email == candidate.email
        || existing.referral_code == candidate.referral_code
        || (existing.wallet_address.is_some() && existing.wallet_address == candidate.wallet_address)
        || (existing.username.is_some() && existing.username == candidate.username)
}

#[async_trait]
impl UserRepositoryTrait for MemoryUserRepository {
    async fn create_user(&self, mut user: User) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| conflicts(u, &user)) {
            return Err(AppError::Conflict(format!(
                "User with email {} conflicts with an existing record.",
                user.email
            )));
        }

        user.id = Some(ObjectId::new());
        users.push(user.clone());
        Ok(user)
    }

    async fn get_user_by_id(&self, id: &ObjectId) -> AppResult<Option<User>> {
        Ok(self.users.read().await.iter().find(|u| u.id.as_ref() == Some(id)).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.find_by_email(email).await)
    }

    async fn get_user_by_wallet(&self, wallet_address: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|u| u.wallet_address.as_deref() == Some(wallet_address))
            .cloned())
    }

    async fn find_referrer(&self, code: &str) -> AppResult<Option<User>> {
        let wallet = code.to_lowercase();
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|u| u.referral_code == code || u.wallet_address.as_deref() == Some(wallet.as_str()))
            .cloned())
    }

    async fn is_username_taken(&self, username: &str, excluding: &ObjectId) -> AppResult<bool> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .any(|u| u.username.as_deref() == Some(username) && u.id.as_ref() != Some(excluding)))
    }

    async fn update_username(&self, id: &ObjectId, username: &str) -> AppResult<Option<User>> {
        let mut users = self.users.write().await;
        match users.iter_mut().find(|u| u.id.as_ref() == Some(id)) {
            Some(user) => {
                user.username = Some(username.to_string());
                user.updated_at = database::user::model::now();
                Ok(Some(user.clone()))
            }
            None => Ok(None),
        }
    }
}

pub struct TestApp {
    pub router: Router,
    pub repository: Arc<MemoryUserRepository>,
    pub config: Arc<AppConfig>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(AppConfig::new_for_test())
    }

    pub fn with_rate_limit(max_requests: u32) -> Self {
        let mut config = AppConfig::new_for_test();
        config.rate_limit_max_requests = max_requests;
        Self::with_config(config)
    }

    pub fn with_config(config: AppConfig) -> Self {
        let config = Arc::new(config);
        let repository = Arc::new(MemoryUserRepository::default());
        let auth_config = AuthConfig::from_app_config(&config).expect("auth config");

        let services = Services::with_repository(repository.clone(), &auth_config);
        let rate_limiter = RateLimitService::new(RateLimitConfig::from(config.as_ref()));
        let router = AppRouter::new(services, config.clone(), rate_limiter);

        Self {
            router,
            repository,
            config,
        }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>, token: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, headers, body }
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(body), None).await
    }

    /// 注册并返回令牌
    pub async fn signup(&self, fullname: &str, email: &str, wallet: Option<&str>) -> String {
        let mut body = serde_json::json!({
            "fullname": fullname,
            "email": email,
            "password": "Secret123",
        });
        if let Some(wallet) = wallet {
            body["walletAddress"] = Value::String(wallet.to_string());
        }

        let response = self.post("/api/auth/signup", body).await;
        assert_eq!(response.status, StatusCode::CREATED, "signup failed: {}", response.body);
        response.body["data"]["token"].as_str().unwrap().to_string()
    }
}

pub const WALLET: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
pub const OTHER_WALLET: &str = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";
