//! Auth HTTP Handlers

use axum::{extract::State, http::HeaderMap, Json};
use std::sync::Arc;

use crate::application::{GetCurrentUser, LoginOrRegister, Logout};
use crate::infrastructure::http::dto::{
    ApiResponse, CurrentUserData, LoginData, LoginRequest, MessageData,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

use super::bearer_token;

/// 登录或注册
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginData>>, ApiError> {
    let response = state
        .login_handler
        .handle(LoginOrRegister {
            email: request.email,
            password: request.password,
        })
        .await?;

    Ok(Json(ApiResponse::success(LoginData::from(response))))
}

/// 登出 - 撤销 Authorization 头携带的会话令牌
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<MessageData>>, ApiError> {
    let token = bearer_token(&headers).unwrap_or_default();

    let response = state.logout_handler.handle(Logout { token }).await?;

    Ok(Json(ApiResponse::success(MessageData {
        message: response.message.to_string(),
    })))
}

/// 当前用户
pub async fn me(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<CurrentUserData>>, ApiError> {
    let response = state
        .current_user_handler
        .handle(GetCurrentUser {
            auth_token: bearer_token(&headers),
        })
        .await?;

    Ok(Json(ApiResponse::success(CurrentUserData::from(response))))
}
