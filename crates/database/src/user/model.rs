use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::prelude::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// 抽奖中奖记录
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LuckyDrawWinning {
    #[serde(default)]
    pub draw_id: Option<ObjectId>,
    #[serde(default)]
    pub prize: f64,
    #[serde(default)]
    pub position: i32,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub won_at: DateTime<Utc>,
}

/// 用户模型（集合 `users`）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// MongoDB文档ID
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub fullname: String,
    /// 小写邮箱，唯一
    pub email: String,
    /// bcrypt 哈希
    pub password: String,
    /// 小写钱包地址，唯一（稀疏索引，因此未绑定时不写入该字段）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default)]
    pub total_referral_commissions: f64,
    /// 推荐人
    #[serde(default)]
    pub referred_by: Option<ObjectId>,
    pub referral_code: String,
    #[serde(default)]
    pub lucky_draw_winnings: Vec<LuckyDrawWinning>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

/// 注册时需要写入的字段，其余字段取默认值
#[derive(Debug, Clone)]
pub struct NewUser {
    pub fullname: String,
    pub email: String,
    pub password_hash: String,
    pub wallet_address: Option<String>,
    pub referred_by: Option<ObjectId>,
}

impl User {
    pub fn new(new_user: NewUser) -> Self {
        let now = now();
        let referral_code = Self::referral_code_for(new_user.wallet_address.as_deref());

        Self {
            id: None,
            fullname: new_user.fullname,
            email: new_user.email,
            password: new_user.password_hash,
            wallet_address: new_user.wallet_address,
            username: None,
            total_referral_commissions: 0.0,
            referred_by: new_user.referred_by,
            referral_code,
            lucky_draw_winnings: Vec::new(),
            is_admin: false,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// 推荐码默认取钱包地址；没有钱包时随机生成
    pub fn referral_code_for(wallet_address: Option<&str>) -> String {
        match wallet_address {
            Some(wallet) => wallet.to_string(),
            None => Self::generate_referral_code(),
        }
    }

    /// `REF` + 10位大写十六进制
    pub fn generate_referral_code() -> String {
        let bytes: [u8; 5] = rand::thread_rng().gen();
        let suffix: String = bytes.iter().map(|b| format!("{:02X}", b)).collect();
        format!("REF{}", suffix)
    }

    pub fn id_hex(&self) -> String {
        self.id.map(|id| id.to_hex()).unwrap_or_default()
    }
}

/// 与BSON精度（毫秒）对齐的当前时间
pub fn now() -> DateTime<Utc> {
    bson::DateTime::now().to_chrono()
}
