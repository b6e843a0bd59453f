use std::sync::Arc;

use validator::Validate;

use crate::dto::auth_dto::{LoginRequest, LoginResponse, RegisterRequest, RegisteredUser};
use crate::dto::ApiResponse;
use crate::services::AuthService;
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub struct AuthController {
    auth: Arc<AuthService>,
}

impl AuthController {
    pub fn new(state: &AppState) -> Self {
        Self {
            auth: state.auth.clone(),
        }
    }

    pub async fn register(&self, request: RegisterRequest) -> AppResult<ApiResponse<RegisteredUser>> {
        request.validate()?;

        let user = self
            .auth
            .register_student(&request.user_id, &request.name, &request.password)
            .await?;

        Ok(ApiResponse::success_with_message(
            RegisteredUser {
                user_id: user.user_id,
                full_name: user.full_name,
                role: user.role,
            },
            "Registration successful",
        ))
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        request.validate()?;

        let session = self.auth.login(&request.user_id, &request.password).await?;

        Ok(LoginResponse {
            success: true,
            token: session.token,
            role: session.user.role,
            user_id: session.user.user_id,
        })
    }
}
