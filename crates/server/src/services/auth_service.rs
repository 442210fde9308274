use crate::{
    auth::{AuthConfig, JwtManager, PasswordHasher},
    dtos::{
        auth_dto::{AuthPayload, LoginDto, SignupDto},
        user_dto::PublicProfile,
    },
};
use async_trait::async_trait;
use database::{DynUserRepository, NewUser, User};
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;
use tracing::{debug, info, warn};
use utils::{
    web3::{is_valid_address, normalize_address},
    AppError, AppResult,
};

pub const EMAIL_TAKEN: &str = "Email already registered";
pub const INVALID_WALLET: &str = "Invalid wallet address";
pub const WALLET_TAKEN: &str = "Wallet address already registered";
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const INVALID_OR_EXPIRED_TOKEN: &str = "Invalid or expired token";
pub const INVALID_TOKEN_OR_USER: &str = "Invalid token or user not found";
pub const INVALID_TOKEN: &str = "Invalid token";
pub const USER_NOT_FOUND_OR_INACTIVE: &str = "User not found or inactive";

pub type DynAuthService = Arc<dyn AuthServiceTrait + Send + Sync>;

#[async_trait]
pub trait AuthServiceTrait {
    /// 注册新用户并签发令牌
    async fn signup(&self, request: SignupDto) -> AppResult<AuthPayload>;

    async fn login(&self, request: LoginDto) -> AppResult<AuthPayload>;

    /// 校验令牌（含有效期），返回对应的活跃用户
    async fn verify_token(&self, token: &str) -> AppResult<User>;

    /// 忽略有效期，只要签名正确且用户仍活跃就重新签发
    async fn refresh_token(&self, token: &str) -> AppResult<AuthPayload>;

    /// Bearer 中间件使用
    async fn authenticate(&self, token: &str) -> AppResult<User>;
}

#[derive(Clone)]
pub struct AuthService {
    repository: DynUserRepository,
    jwt_manager: Arc<JwtManager>,
    password_hasher: PasswordHasher,
}

impl AuthService {
    pub fn new(repository: DynUserRepository, config: &AuthConfig) -> Self {
        Self {
            repository,
            jwt_manager: Arc::new(JwtManager::new(config)),
            password_hasher: PasswordHasher::new(config.bcrypt_cost),
        }
    }

    fn issue(&self, user: &User) -> AppResult<AuthPayload> {
        let token = self.jwt_manager.generate_token(&user.id_hex())?;

        Ok(AuthPayload {
            token,
            user: PublicProfile::from(user),
        })
    }

    /// 签名有效但 `id` 不是 ObjectId 的令牌按无效令牌处理
    fn claimed_user_id(user_id: &str, invalid_message: &str) -> AppResult<ObjectId> {
        ObjectId::parse_str(user_id).map_err(|_| {
            warn!("⚠️ token carries malformed user id {:?}", user_id);
            AppError::Unauthorized(invalid_message.to_string())
        })
    }

    async fn active_user(&self, id: &ObjectId) -> AppResult<Option<User>> {
        let user = self.repository.get_user_by_id(id).await?;
        Ok(user.filter(|u| u.is_active))
    }

    async fn resolve_referrer(&self, referral_code: Option<&str>) -> AppResult<Option<ObjectId>> {
        let code = match referral_code.map(str::trim).filter(|c| !c.is_empty()) {
            Some(code) => code,
            None => return Ok(None),
        };

        match self.repository.find_referrer(code).await? {
            Some(referrer) => {
                debug!("🤝 referral code {} resolved to {}", code, referrer.id_hex());
                Ok(referrer.id)
            }
            None => {
                debug!("🤷 referral code {} not found, ignoring", code);
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl AuthServiceTrait for AuthService {
    async fn signup(&self, request: SignupDto) -> AppResult<AuthPayload> {
        let email = request.email.to_lowercase();

        if self.repository.get_user_by_email(&email).await?.is_some() {
            return Err(AppError::BadRequest(EMAIL_TAKEN.to_string()));
        }

        let wallet_address = match request.wallet_address.as_deref() {
            Some(wallet) => {
                if !is_valid_address(wallet) {
                    return Err(AppError::BadRequest(INVALID_WALLET.to_string()));
                }

                let wallet = normalize_address(wallet);
                if self.repository.get_user_by_wallet(&wallet).await?.is_some() {
                    return Err(AppError::BadRequest(WALLET_TAKEN.to_string()));
                }
                Some(wallet)
            }
            None => None,
        };

        let referred_by = self.resolve_referrer(request.referral_code.as_deref()).await?;
        let password_hash = self.password_hasher.hash(&request.password).await?;

        let user = self
            .repository
            .create_user(User::new(NewUser {
                fullname: request.fullname,
                email,
                password_hash,
                wallet_address,
                referred_by,
            }))
            .await?;

        info!("✅ New user registered: {} ({})", user.email, user.id_hex());
        self.issue(&user)
    }

    async fn login(&self, request: LoginDto) -> AppResult<AuthPayload> {
        let email = request.email.to_lowercase();

        let user = match self.repository.get_user_by_email(&email).await? {
            Some(user) => user,
            None => {
                warn!("⚠️ login attempt for unknown email {}", email);
                return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
            }
        };

        if !user.is_active {
            warn!("⚠️ login attempt for inactive user {}", user.id_hex());
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        if !self.password_hasher.verify(&request.password, &user.password).await? {
            warn!("⚠️ wrong password for user {}", user.id_hex());
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        info!("🔓 User logged in: {}", user.id_hex());
        self.issue(&user)
    }

    async fn verify_token(&self, token: &str) -> AppResult<User> {
        let claims = self
            .jwt_manager
            .verify_token(token)
            .map_err(|_| AppError::Unauthorized(INVALID_OR_EXPIRED_TOKEN.to_string()))?;
        let id = Self::claimed_user_id(&claims.id, INVALID_OR_EXPIRED_TOKEN)?;

        self.active_user(&id)
            .await?
            .ok_or_else(|| AppError::Unauthorized(INVALID_TOKEN_OR_USER.to_string()))
    }

    async fn refresh_token(&self, token: &str) -> AppResult<AuthPayload> {
        let claims = self
            .jwt_manager
            .verify_token_ignore_expiration(token)
            .map_err(|_| AppError::Unauthorized(INVALID_TOKEN.to_string()))?;
        let id = Self::claimed_user_id(&claims.id, INVALID_TOKEN)?;

        let user = self
            .active_user(&id)
            .await?
            .ok_or_else(|| AppError::Unauthorized(USER_NOT_FOUND_OR_INACTIVE.to_string()))?;

        debug!("🔄 token refreshed for user {}", user.id_hex());
        self.issue(&user)
    }

    async fn authenticate(&self, token: &str) -> AppResult<User> {
        let claims = self
            .jwt_manager
            .verify_token(token)
            .map_err(|_| AppError::Unauthorized(INVALID_OR_EXPIRED_TOKEN.to_string()))?;
        let id = Self::claimed_user_id(&claims.id, INVALID_OR_EXPIRED_TOKEN)?;

        self.active_user(&id)
            .await?
            .ok_or_else(|| AppError::Unauthorized(USER_NOT_FOUND_OR_INACTIVE.to_string()))
    }
}
