use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "UserHub API",
        description = "用户注册、登录、令牌校验与个人资料接口文档",
        version = "1.0.0",
        contact(
            name = "API Support",
            email = "support@userhub.dev"
        )
    ),
    paths(
        // System health check
        crate::api::health,
        // Auth endpoints
        crate::api::auth_controller::signup,
        crate::api::auth_controller::login,
        crate::api::auth_controller::verify_token,
        crate::api::auth_controller::refresh_token,
        // User endpoints
        crate::api::user_controller::get_profile,
        crate::api::user_controller::update_profile,
    ),
    components(
        schemas(
            crate::api::HealthResponse,
            // DTOs
            crate::dtos::auth_dto::SignupDto,
            crate::dtos::auth_dto::LoginDto,
            crate::dtos::auth_dto::TokenDto,
            crate::dtos::auth_dto::AuthPayload,
            crate::dtos::auth_dto::UserPayload,
            crate::dtos::user_dto::PublicProfile,
            crate::dtos::user_dto::LuckyDrawWinningDto,
            crate::dtos::user_dto::UpdateProfileDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "系统状态", description = "系统健康检查和状态监控"),
        (name = "auth", description = "注册、登录与令牌管理"),
        (name = "user", description = "用户资料管理")
    )
)]
pub struct ApiDoc;

/// 注册 Bearer JWT 认证方式
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
