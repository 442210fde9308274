use anyhow::{anyhow, Result};
use database::User;
use serde::{Deserialize, Serialize};
use utils::AppConfig;

/// JWT Claims 结构
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// 用户ID（ObjectId 十六进制）
    pub id: String,
    /// 签发时间
    pub iat: u64,
    /// 过期时间
    pub exp: u64,
}

/// bcrypt 支持的强度范围
pub const BCRYPT_COST_RANGE: std::ops::RangeInclusive<u32> = 4..=31;

/// 令牌有效期上限：100 年
pub const MAX_EXPIRES_IN_SECS: u64 = 100 * 365 * 24 * 60 * 60;

/// 认证相关配置
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// 令牌有效期（秒）
    pub jwt_expires_in_secs: u64,
    pub bcrypt_cost: u32,
}

impl AuthConfig {
    pub fn from_app_config(config: &AppConfig) -> Result<Self> {
        if config.jwt_secret.is_empty() {
            return Err(anyhow!("JWT_SECRET must not be empty"));
        }

        if !BCRYPT_COST_RANGE.contains(&config.bcrypt_cost) {
            return Err(anyhow!(
                "BCRYPT_COST must be between {} and {}, got {}",
                BCRYPT_COST_RANGE.start(),
                BCRYPT_COST_RANGE.end(),
                config.bcrypt_cost
            ));
        }

        Ok(Self {
            jwt_secret: config.jwt_secret.clone(),
            jwt_expires_in_secs: parse_expires_in(&config.jwt_expires_in)?,
            bcrypt_cost: config.bcrypt_cost,
        })
    }
}

/// 经过 Bearer 中间件认证的当前用户，挂在请求扩展上
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// 解析 `7d` / `12h` / `30m` / `45s` / `2w` / `1y` 以及纯数字（秒）
pub fn parse_expires_in(value: &str) -> Result<u64> {
    let value = value.trim();
    let split = value.find(|c: char| !c.is_ascii_digit()).unwrap_or(value.len());
    let (amount, unit) = value.split_at(split);

    let amount: u64 = amount
        .parse()
        .map_err(|_| anyhow!("Invalid JWT_EXPIRES_IN value: {:?}", value))?;

    let multiplier = match unit.trim() {
        "" | "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        "d" => 24 * 60 * 60,
        "w" => 7 * 24 * 60 * 60,
        "y" => 365 * 24 * 60 * 60,
        other => return Err(anyhow!("Unsupported JWT_EXPIRES_IN unit: {:?}", other)),
    };

    amount
        .checked_mul(multiplier)
        .filter(|secs| (1..=MAX_EXPIRES_IN_SECS).contains(secs))
        .ok_or_else(|| anyhow!("Invalid JWT_EXPIRES_IN value: {:?}", value))
}
