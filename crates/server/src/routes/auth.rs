use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use service::auth::domain::{LoginInput, RoleGrant};
use tracing::debug;

use crate::errors::JsonApiError;
use crate::routes::ServerState;

/// 校验用户名/密码并返回角色，不签发任何 token
#[utoipa::path(post, path = "/contact/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Role of the matching user", body = crate::openapi::RoleDoc), (status = 400, description = "Missing credentials", body = crate::openapi::ErrorDoc), (status = 401, description = "Invalid credentials", body = crate::openapi::ErrorDoc), (status = 500, description = "Store failure", body = crate::openapi::ErrorDoc)))]
pub async fn login(
    State(state): State<ServerState>,
    body: Result<Json<LoginInput>, JsonRejection>,
) -> Result<Json<RoleGrant>, JsonApiError> {
    // 无法解析的 body 视为缺少字段，交给服务层返回 400
    let input = match body {
        Ok(Json(input)) => input,
        Err(rejection) => {
            debug!(err = %rejection.body_text(), "unreadable login body");
            LoginInput::default()
        }
    };
    Ok(Json(state.auth.verify(input).await?))
}
