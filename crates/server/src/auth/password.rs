use utils::{AppError, AppResult};

/// bcrypt 口令哈希，计算在阻塞线程池中执行
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub async fn hash(&self, password: &str) -> AppResult<String> {
        let password = password.to_string();
        let cost = self.cost;

        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| AppError::InternalServerErrorWithContext(format!("hash task failed: {}", e)))?
            .map_err(|e| AppError::InternalServerErrorWithContext(format!("bcrypt hash failed: {}", e)))
    }

    /// 哈希格式非法时按不匹配处理
    pub async fn verify(&self, password: &str, hash: &str) -> AppResult<bool> {
        let password = password.to_string();
        let hash = hash.to_string();

        let result = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| AppError::InternalServerErrorWithContext(format!("verify task failed: {}", e)))?;

        match result {
            Ok(matched) => Ok(matched),
            Err(e) => {
                tracing::warn!("⚠️ bcrypt verify failed: {}", e);
                Ok(false)
            }
        }
    }
}
