use crate::{
    auth::{jwt_auth_middleware, CurrentUser},
    dtos::{
        auth_dto::UserPayload,
        response::ApiResponse,
        user_dto::{PublicProfile, UpdateProfileDto},
    },
    extractors::validate_ordered,
    services::Services,
};
use axum::{middleware, routing::get, Extension, Json, Router};
use utils::AppResult;

/// 用户资料控制器，所有路由都要求 Bearer 认证
pub struct UserController;

impl UserController {
    pub fn app(services: Services) -> Router {
        Router::new()
            .route("/profile", get(get_profile).put(update_profile))
            .route_layer(middleware::from_fn_with_state(services, jwt_auth_middleware))
    }
}

/// 获取当前用户资料
#[utoipa::path(
    get,
    path = "/api/user/profile",
    tag = "user",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "当前用户资料", body = PublicProfile),
        (status = 401, description = "未认证或令牌无效")
    )
)]
pub async fn get_profile(
    Extension(services): Extension<Services>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Json<ApiResponse<PublicProfile>> {
    Json(ApiResponse::data(services.user.get_profile(&user)))
}

/// 更新当前用户资料
#[utoipa::path(
    put,
    path = "/api/user/profile",
    tag = "user",
    security(("bearer" = [])),
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "更新成功", body = UserPayload),
        (status = 400, description = "参数校验失败或用户名已被占用"),
        (status = 401, description = "未认证或令牌无效")
    )
)]
pub async fn update_profile(
    Extension(services): Extension<Services>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    payload: Option<Json<UpdateProfileDto>>,
) -> AppResult<Json<ApiResponse<UserPayload>>> {
    // 缺少请求体按 `{}` 处理，沿用当前资料
    let req = payload.map(|Json(req)| req).unwrap_or_default();
    validate_ordered(&req)?;

    let profile = services.user.update_profile(&user, req).await?;

    Ok(Json(ApiResponse::success(
        "Profile updated successfully",
        UserPayload { user: profile },
    )))
}
