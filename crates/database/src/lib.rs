////////////////////////////////////////////////////////////////////////
//
// 1. 每个Domain(Entity)单独一个文件夹
// 2. 每个Domain由两部分组成:
//    - model: 定义Schema
//    - repository: 实际的数据库底层操作
//
//////////////////////////////////////////////////////////////////////

use mongodb::{bson::doc, Client, Collection};
use std::sync::Arc;
use tracing::info;
use utils::{AppConfig, AppResult};

pub mod maintenance;
pub mod user;

pub const USERS_COLLECTION: &str = "users";

#[derive(Clone, Debug)]
pub struct Database {
    pub db: mongodb::Database,
    pub users: Collection<user::model::User>,
}

impl Database {
    pub async fn new(config: Arc<AppConfig>) -> AppResult<Self> {
        let client = Client::with_uri_str(&config.mongo_uri).await?;
        let db: mongodb::Database = client.database(&config.mongo_db);

        let users = db.collection(USERS_COLLECTION);

        info!("🧱 database({:#}) connected.", &config.mongo_db);

        Ok(Database { db, users })
    }

    /// 连通性检查
    pub async fn ping(&self) -> AppResult<()> {
        self.db.run_command(doc! { "ping": 1 }, None).await?;
        Ok(())
    }

    /// 初始化全部集合索引
    pub async fn init_indexes(&self) -> AppResult<()> {
        self.init_user_indexes().await?;

        info!("✅ 数据库索引初始化完成");
        Ok(())
    }
}

pub use user::model::{LuckyDrawWinning, NewUser, User};
pub use user::repository::{DynUserRepository, UserRepositoryTrait};
