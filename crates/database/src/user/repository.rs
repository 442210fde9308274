use crate::{
    user::model::{self, User},
    Database,
};
use async_trait::async_trait;
use mongodb::{
    bson::{doc, oid::ObjectId, Bson},
    error::{ErrorKind, WriteFailure},
    options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument},
    IndexModel,
};
use std::sync::Arc;
use tracing::{debug, info};
use utils::{AppError, AppResult};

pub type DynUserRepository = Arc<dyn UserRepositoryTrait + Send + Sync>;

/// MongoDB duplicate key 错误码
const DUPLICATE_KEY_CODE: i32 = 11000;

// 主要用于Service中，表示提供了该Trait功能
#[async_trait]
pub trait UserRepositoryTrait {
    /// 写入新用户，返回带 `_id` 的记录
    async fn create_user(&self, user: User) -> AppResult<User>;

    async fn get_user_by_id(&self, id: &ObjectId) -> AppResult<Option<User>>;

    /// `email` 需已转为小写
    async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// `wallet_address` 需已转为小写
    async fn get_user_by_wallet(&self, wallet_address: &str) -> AppResult<Option<User>>;

    /// 按推荐码或钱包地址查找推荐人
    async fn find_referrer(&self, code: &str) -> AppResult<Option<User>>;

    /// 用户名是否已被其他用户占用
    async fn is_username_taken(&self, username: &str, excluding: &ObjectId) -> AppResult<bool>;

    async fn update_username(&self, id: &ObjectId, username: &str) -> AppResult<Option<User>>;
}

#[async_trait]
impl UserRepositoryTrait for Database {
    async fn create_user(&self, mut user: User) -> AppResult<User> {
        let result = self.users.insert_one(&user, None).await.map_err(|e| {
            if is_duplicate_key(&e) {
                AppError::Conflict(format!("User with email {} conflicts with an existing record.", user.email))
            } else {
                AppError::from(e)
            }
        })?;

        match result.inserted_id {
            Bson::ObjectId(id) => user.id = Some(id),
            other => {
                return Err(AppError::InternalServerErrorWithContext(format!(
                    "Unexpected inserted id: {:?}",
                    other
                )))
            }
        }

        debug!("🆕 user {} created", user.id_hex());
        Ok(user)
    }

    async fn get_user_by_id(&self, id: &ObjectId) -> AppResult<Option<User>> {
        let user = self.users.find_one(doc! { "_id": id }, None).await?;

        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = self.users.find_one(doc! { "email": email }, None).await?;

        Ok(user)
    }

    async fn get_user_by_wallet(&self, wallet_address: &str) -> AppResult<Option<User>> {
        let user = self
            .users
            .find_one(doc! { "walletAddress": wallet_address }, None)
            .await?;

        Ok(user)
    }

    async fn find_referrer(&self, code: &str) -> AppResult<Option<User>> {
        let filter = doc! {
            "$or": [
                { "referralCode": code },
                { "walletAddress": code.to_lowercase() },
            ]
        };
        let referrer = self.users.find_one(filter, None).await?;

        Ok(referrer)
    }

    async fn is_username_taken(&self, username: &str, excluding: &ObjectId) -> AppResult<bool> {
        let filter = doc! {
            "username": username,
            "_id": { "$ne": excluding },
        };
        let existing = self.users.find_one(filter, None).await?;

        Ok(existing.is_some())
    }

    async fn update_username(&self, id: &ObjectId, username: &str) -> AppResult<Option<User>> {
        let update = doc! {
            "$set": {
                "username": username,
                "updatedAt": bson::DateTime::from_chrono(model::now()),
            }
        };
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let user = self
            .users
            .find_one_and_update(doc! { "_id": id }, update, options)
            .await
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    AppError::Conflict("Username already taken".to_string())
                } else {
                    AppError::from(e)
                }
            })?;

        Ok(user)
    }
}

impl Database {
    /// 初始化 users 集合索引
    pub async fn init_user_indexes(&self) -> AppResult<()> {
        info!("🔧 初始化User数据库索引...");

        let result = self.users.create_indexes(user_indexes(), None).await?;

        info!("✅ User数据库索引初始化完成: {:?}", result.index_names);
        Ok(())
    }
}

/// users 集合的全部索引定义
pub fn user_indexes() -> Vec<IndexModel> {
    vec![
        // 邮箱唯一
        IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().name("email_1".to_string()).unique(true).build())
            .build(),
        // 钱包地址唯一，未绑定钱包的用户不参与
        IndexModel::builder()
            .keys(doc! { "walletAddress": 1 })
            .options(
                IndexOptions::builder()
                    .name("walletAddress_1".to_string())
                    .unique(true)
                    .sparse(true)
                    .build(),
            )
            .build(),
        IndexModel::builder()
            .keys(doc! { "referralCode": 1 })
            .options(
                IndexOptions::builder()
                    .name("referralCode_1".to_string())
                    .unique(true)
                    .build(),
            )
            .build(),
        IndexModel::builder()
            .keys(doc! { "username": 1 })
            .options(
                IndexOptions::builder()
                    .name("username_1".to_string())
                    .unique(true)
                    .sparse(true)
                    .build(),
            )
            .build(),
    ]
}

pub fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    match error.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == DUPLICATE_KEY_CODE,
        ErrorKind::Command(e) => e.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}
