use crate::{dtos::serde_helpers::trimmed_non_empty_option, extractors::FieldOrder};
use chrono::{DateTime, Utc};
use database::{LuckyDrawWinning, User};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// 对外可见的用户资料，不含密码和内部标记
#[derive(Clone, Debug, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub id: String,
    pub fullname: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub total_referral_commissions: f64,
    pub lucky_draw_winnings: Vec<LuckyDrawWinningDto>,
    pub referral_code: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LuckyDrawWinningDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draw_id: Option<String>,
    pub prize: f64,
    pub position: i32,
    pub won_at: DateTime<Utc>,
}

impl From<&LuckyDrawWinning> for LuckyDrawWinningDto {
    fn from(winning: &LuckyDrawWinning) -> Self {
        Self {
            draw_id: winning.draw_id.map(|id| id.to_hex()),
            prize: winning.prize,
            position: winning.position,
            won_at: winning.won_at,
        }
    }
}

impl From<&User> for PublicProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id_hex(),
            fullname: user.fullname.clone(),
            email: user.email.clone(),
            wallet_address: user.wallet_address.clone(),
            username: user.username.clone(),
            total_referral_commissions: user.total_referral_commissions,
            lucky_draw_winnings: user.lucky_draw_winnings.iter().map(LuckyDrawWinningDto::from).collect(),
            referral_code: user.referral_code.clone(),
            created_at: user.created_at,
        }
    }
}

/// 更新资料请求体，未提供的字段保持原值
#[derive(Clone, Debug, Deserialize, Validate, Default, ToSchema)]
pub struct UpdateProfileDto {
    #[serde(default, deserialize_with = "trimmed_non_empty_option")]
    #[validate(length(min = 3, max = 30, message = "Username must be between 3 and 30 characters"))]
    #[schema(example = "alice")]
    pub username: Option<String>,
}

impl FieldOrder for UpdateProfileDto {
    const FIELD_ORDER: &'static [&'static str] = &["username"];
}
