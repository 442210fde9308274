use crate::auth::models::{AuthConfig, Claims};
use anyhow::{anyhow, Result};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

/// JWT令牌管理器
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expires_in_secs: u64,
}

impl JwtManager {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            expires_in_secs: config.jwt_expires_in_secs,
        }
    }

    /// 生成JWT令牌
    pub fn generate_token(&self, user_id: &str) -> Result<String> {
        let now = Utc::now().timestamp() as u64;
        let exp = now
            .checked_add(self.expires_in_secs)
            .ok_or_else(|| anyhow!("JWT expiry overflows: {}s", self.expires_in_secs))?;

        let claims = Claims {
            id: user_id.to_string(),
            iat: now,
            exp,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| anyhow!("Failed to generate JWT token: {}", e))
    }

    /// 验证签名与有效期
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        self.decode(token, Self::validation())
    }

    /// 只验证签名，忽略过期时间（刷新令牌时使用）
    pub fn verify_token_ignore_expiration(&self, token: &str) -> Result<Claims> {
        let mut validation = Self::validation();
        validation.validate_exp = false;

        self.decode(token, validation)
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation
    }

    fn decode(&self, token: &str, validation: Validation) -> Result<Claims> {
        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| anyhow!("Invalid JWT token: {}", e))
    }
}

/// JWT令牌提取器
pub struct TokenExtractor;

impl TokenExtractor {
    /// 从Authorization头部提取Bearer令牌
    pub fn extract_bearer_token(auth_header: Option<&str>) -> Option<String> {
        auth_header
            .and_then(|header| header.strip_prefix("Bearer "))
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test_secret_key_for_jwt_testing_only".to_string(),
            jwt_expires_in_secs: 3600,
            bcrypt_cost: 4,
        }
    }

    #[test]
    fn test_jwt_generation_and_verification() {
        let jwt_manager = JwtManager::new(&create_test_config());

        let token = jwt_manager.generate_token("65a1f0c2e4b0a1b2c3d4e5f6").unwrap();
        let claims = jwt_manager.verify_token(&token).unwrap();

        assert_eq!(claims.id, "65a1f0c2e4b0a1b2c3d4e5f6");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_expired_token() {
        let config = create_test_config();
        let jwt_manager = JwtManager::new(&config);

        let now = Utc::now().timestamp() as u64;
        let claims = Claims {
            id: "user".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
        .unwrap();

        assert!(jwt_manager.verify_token(&token).is_err());
        assert_eq!(jwt_manager.verify_token_ignore_expiration(&token).unwrap(), claims);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let jwt_manager = JwtManager::new(&create_test_config());
        let other = JwtManager::new(&AuthConfig {
            jwt_secret: "another_secret".to_string(),
            ..create_test_config()
        });

        let token = other.generate_token("user").unwrap();
        assert!(jwt_manager.verify_token(&token).is_err());
        assert!(jwt_manager.verify_token_ignore_expiration(&token).is_err());
        assert!(jwt_manager.verify_token("not-a-token").is_err());
    }

    #[test]
    fn test_overflowing_expiry_is_an_error() {
        let jwt_manager = JwtManager::new(&AuthConfig {
            jwt_expires_in_secs: u64::MAX,
            ..create_test_config()
        });

        assert!(jwt_manager.generate_token("user").is_err());
    }

    #[test]
    fn test_bearer_token_extraction() {
        let auth_header = "Bearer eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...";
        let token = TokenExtractor::extract_bearer_token(Some(auth_header));
        assert_eq!(token, Some("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...".to_string()));

        assert_eq!(TokenExtractor::extract_bearer_token(Some("Basic dXNlcjpwYXNz")), None);
        assert_eq!(TokenExtractor::extract_bearer_token(Some("Bearer ")), None);
        assert_eq!(TokenExtractor::extract_bearer_token(None), None);
    }
}
