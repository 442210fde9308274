pub mod auth_dto;
pub mod response;
pub mod serde_helpers;
pub mod user_dto;
