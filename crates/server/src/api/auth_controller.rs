use crate::{
    dtos::{
        auth_dto::{AuthPayload, LoginDto, SignupDto, TokenDto, UserPayload},
        response::ApiResponse,
        user_dto::PublicProfile,
    },
    extractors::ValidationExtractor,
    services::Services,
};
use axum::{http::StatusCode, routing::post, Extension, Json, Router};
use utils::{AppError, AppResult};

pub const TOKEN_REQUIRED: &str = "Token is required";

/// 认证控制器
pub struct AuthController;

impl AuthController {
    pub fn app() -> Router {
        Router::new()
            .route("/signup", post(signup))
            .route("/login", post(login))
            .route("/verify-token", post(verify_token))
            .route("/refresh-token", post(refresh_token))
    }
}

/// 请求体缺失、无法解析或 token 为空时统一返回 400
fn required_token(payload: Option<Json<TokenDto>>) -> AppResult<String> {
    payload
        .as_ref()
        .and_then(|Json(dto)| dto.token())
        .map(str::to_string)
        .ok_or_else(|| AppError::BadRequest(TOKEN_REQUIRED.to_string()))
}

/// 用户注册
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    tag = "auth",
    request_body = SignupDto,
    responses(
        (status = 201, description = "注册成功", body = AuthPayload),
        (status = 400, description = "参数校验失败、邮箱或钱包已注册、钱包地址无效"),
        (status = 429, description = "请求过于频繁")
    )
)]
pub async fn signup(
    Extension(services): Extension<Services>,
    ValidationExtractor(req): ValidationExtractor<SignupDto>,
) -> AppResult<(StatusCode, Json<ApiResponse<AuthPayload>>)> {
    let payload = services.auth.signup(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("User registered successfully", payload)),
    ))
}

/// 邮箱密码登录
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginDto,
    responses(
        (status = 200, description = "登录成功", body = AuthPayload),
        (status = 400, description = "参数校验失败"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    Extension(services): Extension<Services>,
    ValidationExtractor(req): ValidationExtractor<LoginDto>,
) -> AppResult<Json<ApiResponse<AuthPayload>>> {
    let payload = services.auth.login(req).await?;

    Ok(Json(ApiResponse::success("Login successful", payload)))
}

/// 校验令牌
#[utoipa::path(
    post,
    path = "/api/auth/verify-token",
    tag = "auth",
    request_body = TokenDto,
    responses(
        (status = 200, description = "令牌有效", body = UserPayload),
        (status = 400, description = "Token is required"),
        (status = 401, description = "令牌无效、已过期或用户不存在")
    )
)]
pub async fn verify_token(
    Extension(services): Extension<Services>,
    payload: Option<Json<TokenDto>>,
) -> AppResult<Json<ApiResponse<UserPayload>>> {
    let token = required_token(payload)?;
    let user = services.auth.verify_token(&token).await?;

    Ok(Json(ApiResponse::success(
        "Token is valid",
        UserPayload {
            user: PublicProfile::from(&user),
        },
    )))
}

/// 刷新令牌（允许已过期的令牌）
#[utoipa::path(
    post,
    path = "/api/auth/refresh-token",
    tag = "auth",
    request_body = TokenDto,
    responses(
        (status = 200, description = "刷新成功", body = AuthPayload),
        (status = 400, description = "Token is required"),
        (status = 401, description = "令牌无效或用户不可用")
    )
)]
pub async fn refresh_token(
    Extension(services): Extension<Services>,
    payload: Option<Json<TokenDto>>,
) -> AppResult<Json<ApiResponse<AuthPayload>>> {
    let token = required_token(payload)?;
    let payload = services.auth.refresh_token(&token).await?;

    Ok(Json(ApiResponse::success("Token refreshed successfully", payload)))
}
