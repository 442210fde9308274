pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod rate_limit;

pub use jwt::*;
pub use middleware::*;
pub use models::*;
pub use password::PasswordHasher;
pub use rate_limit::{rate_limit_middleware, RateLimitConfig, RateLimitResult, RateLimitService};
