//! JWT authentication middleware
//!
//! Verifies bearer tokens and injects the [`AuthenticatedUser`] into the
//! request extensions. Role guards run after it.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
    Extension,
};
use uuid::Uuid;

use crate::{
    models::UserRole,
    state::AppState,
    utils::errors::{forbidden_error, AppError},
    utils::jwt::{extract_token_from_header, verify_token, JwtClaims},
};

/// Caller identity taken from a verified token
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub user_id: String,
    pub role: UserRole,
}

impl TryFrom<JwtClaims> for AuthenticatedUser {
    type Error = AppError;

    fn try_from(claims: JwtClaims) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Unauthorized("Invalid account id in token".to_string()))?;

        Ok(Self {
            id,
            user_id: claims.user_id,
            role: claims.role,
        })
    }
}

fn authenticate(state: &AppState, request: &Request) -> Result<Option<AuthenticatedUser>, AppError> {
    let Some(header_value) = request.headers().get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let raw = header_value
        .to_str()
        .map_err(|_| AppError::Unauthorized("Malformed Authorization header".to_string()))?;
    let token = extract_token_from_header(raw)?;
    let claims = verify_token(token, &state.jwt)?;

    AuthenticatedUser::try_from(claims).map(Some)
}

/// Require a valid bearer token
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticate(&state, &request)?
        .ok_or_else(|| AppError::Unauthorized("Authorization token required".to_string()))?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Attach the caller when a token is present; anonymous requests pass
/// through. A present but invalid token is still rejected.
pub async fn optional_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(user) = authenticate(&state, &request)? {
        request.extensions_mut().insert(user);
    }

    Ok(next.run(request).await)
}

/// Coordinators and admins only
pub async fn route_manager_middleware(
    Extension(user): Extension<AuthenticatedUser>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !user.role.manages_routes() {
        return Err(forbidden_error(
            "manage routes",
            "coordinator or admin role required",
        ));
    }

    Ok(next.run(request).await)
}

/// Drivers, coordinators and admins
pub async fn incident_reporter_middleware(
    Extension(user): Extension<AuthenticatedUser>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !user.role.reports_incidents() {
        return Err(forbidden_error("report incidents", "staff role required"));
    }

    Ok(next.run(request).await)
}
