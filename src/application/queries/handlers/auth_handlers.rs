//! Auth Query Handlers

use std::sync::Arc;
use uuid::Uuid;

use crate::application::error::ApplicationError;
use crate::application::ports::AccessControlPort;
use crate::application::queries::GetCurrentUser;

/// 当前用户响应
///
/// 令牌无效时 logged_in = false，不报错
#[derive(Debug, Clone)]
pub struct CurrentUserResponse {
    pub logged_in: bool,
    pub user_id: Option<Uuid>,
    pub name: Option<String>,
    pub role: Option<String>,
    pub email: Option<String>,
}

/// GetCurrentUser Handler
pub struct GetCurrentUserHandler {
    access_control: Arc<dyn AccessControlPort>,
}

impl GetCurrentUserHandler {
    pub fn new(access_control: Arc<dyn AccessControlPort>) -> Self {
        Self { access_control }
    }

    pub async fn handle(
        &self,
        query: GetCurrentUser,
    ) -> Result<CurrentUserResponse, ApplicationError> {
        let user = self
            .access_control
            .current_user(query.auth_token.as_deref())
            .await?;

        Ok(match user {
            Some(user) => CurrentUserResponse {
                logged_in: true,
                user_id: Some(user.id),
                name: Some(user.name),
                role: Some(user.role),
                email: Some(user.email),
            },
            None => CurrentUserResponse {
                logged_in: false,
                user_id: None,
                name: None,
                role: None,
                email: None,
            },
        })
    }
}
