use crate::{
    dtos::{
        serde_helpers::{trimmed, trimmed_option},
        user_dto::PublicProfile,
    },
    extractors::FieldOrder,
};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use utils::web3::is_wallet_address_format;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// 注册请求体
#[derive(Clone, Debug, Deserialize, Validate, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupDto {
    /// 全名，3-30个字符
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 3, max = 30, message = "fullname must be between 3 and 30 characters"))]
    #[schema(example = "Alice Doe")]
    pub fullname: String,

    #[serde(default, deserialize_with = "trimmed")]
    #[validate(email(message = "Please provide a valid email"))]
    #[schema(example = "alice@example.com")]
    pub email: String,

    /// 至少6位，需包含大写字母、小写字母和数字
    #[serde(default)]
    #[validate(
        length(min = 6, message = "Password must be at least 6 characters long"),
        custom = "validate_password_strength"
    )]
    #[schema(example = "Secret123")]
    pub password: String,

    /// 可选的以太坊钱包地址
    #[serde(default, deserialize_with = "trimmed_option")]
    #[validate(custom = "validate_wallet_format")]
    #[schema(example = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed")]
    pub wallet_address: Option<String>,

    /// 推荐码或推荐人钱包地址
    #[serde(default, deserialize_with = "trimmed_option")]
    pub referral_code: Option<String>,
}

impl FieldOrder for SignupDto {
    const FIELD_ORDER: &'static [&'static str] = &["fullname", "email", "password", "walletAddress", "referralCode"];
}

/// 登录请求体
#[derive(Clone, Debug, Deserialize, Validate, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginDto {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl FieldOrder for LoginDto {
    const FIELD_ORDER: &'static [&'static str] = &["email", "password"];
}

/// verify-token / refresh-token 请求体
#[derive(Clone, Debug, Deserialize, Default, ToSchema)]
pub struct TokenDto {
    #[serde(default)]
    pub token: Option<String>,
}

impl TokenDto {
    /// 缺失或空串都视为未提供
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }
}

/// 注册、登录、刷新成功后返回的数据
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct AuthPayload {
    pub token: String,
    pub user: PublicProfile,
}

#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct UserPayload {
    pub user: PublicProfile,
}

fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if has_lower && has_upper && has_digit {
        return Ok(());
    }

    let mut error = ValidationError::new("password_strength");
    error.message = Some(Cow::from(
        "Password must contain at least one uppercase letter, one lowercase letter, and one number",
    ));
    Err(error)
}

fn validate_wallet_format(wallet_address: &str) -> Result<(), ValidationError> {
    if is_wallet_address_format(wallet_address) {
        return Ok(());
    }

    let mut error = ValidationError::new("wallet_address_format");
    error.message = Some(Cow::from("Invalid wallet address format"));
    Err(error)
}
