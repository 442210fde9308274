use crate::dtos::user_dto::{PublicProfile, UpdateProfileDto};
use async_trait::async_trait;
use database::{DynUserRepository, User};
use std::sync::Arc;
use tracing::info;
use utils::{AppError, AppResult};

pub const USERNAME_TAKEN: &str = "Username already taken";

pub type DynUserService = Arc<dyn UserServiceTrait + Send + Sync>;

#[async_trait]
pub trait UserServiceTrait {
    fn get_profile(&self, user: &User) -> PublicProfile;

    async fn update_profile(&self, user: &User, request: UpdateProfileDto) -> AppResult<PublicProfile>;
}

#[derive(Clone)]
pub struct UserService {
    repository: DynUserRepository,
}

impl UserService {
    pub fn new(repository: DynUserRepository) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl UserServiceTrait for UserService {
    fn get_profile(&self, user: &User) -> PublicProfile {
        PublicProfile::from(user)
    }

    async fn update_profile(&self, user: &User, request: UpdateProfileDto) -> AppResult<PublicProfile> {
        let id = user
            .id
            .ok_or_else(|| AppError::InternalServerErrorWithContext("authenticated user has no _id".to_string()))?;

        let username = match request.username {
            Some(username) if user.username.as_deref() != Some(username.as_str()) => username,
            // 未提供或与当前相同，保持原值
            _ => return Ok(PublicProfile::from(user)),
        };

        if self.repository.is_username_taken(&username, &id).await? {
            return Err(AppError::BadRequest(USERNAME_TAKEN.to_string()));
        }

        let updated = self
            .repository
            .update_username(&id, &username)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        info!("✏️ User {} changed username to {}", updated.id_hex(), username);
        Ok(PublicProfile::from(&updated))
    }
}
