use crate::{
    auth::{CurrentUser, TokenExtractor},
    services::Services,
};
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use tracing::debug;
use utils::{AppError, AppResult};

pub const NO_TOKEN_MESSAGE: &str = "Access denied. No token provided.";

/// JWT认证中间件
///
/// 从 `Authorization: Bearer <token>` 中取出令牌，校验后把用户记录以 [`CurrentUser`]
/// 的形式挂到请求扩展上，供后续 handler 读取。
pub async fn jwt_auth_middleware(
    State(services): State<Services>,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    let token = TokenExtractor::extract_bearer_token(
        request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok()),
    )
    .ok_or_else(|| AppError::Unauthorized(NO_TOKEN_MESSAGE.to_string()))?;

    let user = services.auth.authenticate(&token).await?;
    debug!("🔐 authenticated user {} for {}", user.id_hex(), request.uri().path());

    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}
