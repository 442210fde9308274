//! users 集合的索引修复。
//!
//! 早期版本在 users 上建过 `userId_1` 唯一索引，新文档不再写入 `userId`，
//! 导致第二个用户注册时触发 duplicate key。这里负责列出并清理该索引。

use crate::Database;
use futures::TryStreamExt;
use mongodb::{bson::Document, error::ErrorKind, Collection};
use tracing::{error, info, warn};
use utils::AppResult;

/// 需要清理的遗留索引
pub const LEGACY_USER_ID_INDEX: &str = "userId_1";

/// MongoDB IndexNotFound 错误码
const INDEX_NOT_FOUND_CODE: i32 = 27;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSummary {
    pub name: String,
    pub keys: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    Dropped,
    NotFound,
    /// 删除失败，保留驱动返回的错误信息
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct RepairReport {
    pub before: Vec<IndexSummary>,
    pub outcome: DropOutcome,
    pub after: Vec<IndexSummary>,
}

pub struct IndexMaintenance {
    users: Collection<Document>,
}

impl IndexMaintenance {
    pub fn new(database: &Database) -> Self {
        Self {
            users: database.db.collection(crate::USERS_COLLECTION),
        }
    }

    pub async fn list_user_indexes(&self) -> AppResult<Vec<IndexSummary>> {
        let indexes: Vec<mongodb::IndexModel> = self.users.list_indexes(None).await?.try_collect().await?;

        Ok(indexes
            .into_iter()
            .map(|index| IndexSummary {
                name: index.options.and_then(|o| o.name).unwrap_or_default(),
                keys: serde_json::to_string(&index.keys).unwrap_or_else(|_| format!("{:?}", index.keys)),
            })
            .collect())
    }

    /// 删除索引；索引不存在不视为错误，其余失败记录在结果里
    pub async fn drop_index_if_exists(&self, name: &str) -> DropOutcome {
        drop_outcome(name, self.users.drop_index(name, None).await)
    }

    /// 列出索引 -> 删除遗留索引 -> 再次列出
    ///
    /// 删除失败不会中断流程，第二次列出的结果照常返回。
    pub async fn repair(&self) -> AppResult<RepairReport> {
        let before = self.list_user_indexes().await?;
        log_indexes("📊 Current indexes on users collection", &before);

        let outcome = self.drop_index_if_exists(LEGACY_USER_ID_INDEX).await;

        let after = self.list_user_indexes().await?;
        log_indexes("📊 Indexes after cleanup", &after);

        Ok(RepairReport { before, outcome, after })
    }
}

fn drop_outcome(name: &str, result: mongodb::error::Result<()>) -> DropOutcome {
    match result {
        Ok(()) => {
            info!("✅ Successfully dropped {} index", name);
            DropOutcome::Dropped
        }
        Err(e) if is_index_not_found(&e) => {
            warn!("⚠️ {} index not found (already removed)", name);
            DropOutcome::NotFound
        }
        Err(e) => {
            error!("❌ Error dropping {} index: {}", name, e);
            DropOutcome::Failed(e.to_string())
        }
    }
}

fn log_indexes(title: &str, indexes: &[IndexSummary]) {
    info!("{}:", title);
    for index in indexes {
        info!("  - {}: {}", index.name, index.keys);
    }
}

fn is_index_not_found(error: &mongodb::error::Error) -> bool {
    match error.kind.as_ref() {
        ErrorKind::Command(e) => e.code == INDEX_NOT_FOUND_CODE || e.message.contains("index not found"),
        _ => error.to_string().contains("index not found"),
    }
}
