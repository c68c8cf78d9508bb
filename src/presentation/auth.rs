use crate::domain::user::{Role, TokenRequest};
use crate::presentation::handlers::{ApiError, AppState};
use crate::presentation::middleware::AuthenticatedUser;
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdminCheckResponse {
    pub admin: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InstructorCheckResponse {
    pub instructor: bool,
}

/// Signs a token for the submitted identity. The identity is taken on trust.
#[instrument(skip(state, req), fields(email = %req.email))]
pub async fn issue_token(
    state: web::Data<AppState>,
    req: web::Json<TokenRequest>,
) -> Result<HttpResponse, ApiError> {
    info!("Token request received");

    let token = state
        .auth_service
        .issue_token(req.into_inner())
        .map_err(|e| {
            error!(error = %e, "Failed to issue token");
            ApiError::from(e)
        })?;

    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}

#[instrument(skip(state), fields(caller = %user.email, target = %*path))]
pub async fn check_admin(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let admin = state
        .auth_service
        .check_role(&user.email, &path.into_inner(), Role::Admin)
        .await?;
    Ok(HttpResponse::Ok().json(AdminCheckResponse { admin }))
}

#[instrument(skip(state), fields(caller = %user.email, target = %*path))]
pub async fn check_instructor(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let instructor = state
        .auth_service
        .check_role(&user.email, &path.into_inner(), Role::Instructor)
        .await?;
    Ok(HttpResponse::Ok().json(InstructorCheckResponse { instructor }))
}
