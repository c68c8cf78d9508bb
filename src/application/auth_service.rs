use crate::domain::error::DomainError;
use crate::domain::repository::UserRepository;
use crate::domain::user::{Role, TokenRequest};
use crate::infrastructure::security::{generate_token, validate_token};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Rejects the request unless `target` is the caller's own email.
pub fn ensure_owner(caller_email: &str, target: &str) -> Result<(), DomainError> {
    if caller_email == target {
        Ok(())
    } else {
        warn!(caller = caller_email, target = target, "Ownership check failed");
        Err(DomainError::Forbidden(
            "requested email does not match the authenticated user".to_string(),
        ))
    }
}

/// Issues access tokens and answers role questions against the student directory.
pub struct AuthService<R: UserRepository> {
    user_repository: Arc<R>,
    jwt_secret: String,
}

impl<R: UserRepository> AuthService<R> {
    pub fn new(user_repository: Arc<R>, jwt_secret: String) -> Self {
        Self {
            user_repository,
            jwt_secret,
        }
    }

    /// Signs a token for whatever email is submitted.
    ///
    /// No password or session is checked here: the caller is trusted to have
    /// authenticated the user with the identity provider beforehand.
    #[instrument(skip(self, req), fields(email = %req.email))]
    pub fn issue_token(&self, req: TokenRequest) -> Result<String> {
        if req.email.trim().is_empty() {
            return Err(DomainError::Validation("email is required".to_string()).into());
        }
        warn!(email = %req.email, "Issuing token without credential check");

        let token = generate_token(&req.email, &self.jwt_secret).map_err(|e| {
            error!(error = %e, "Failed to generate token");
            DomainError::Internal(format!("Failed to generate token: {}", e))
        })?;

        info!(email = %req.email, "Token issued");
        Ok(token)
    }

    /// Verifies an `Authorization` header value and returns the email its
    /// bearer token was issued for.
    pub fn authenticate(&self, authorization: &str) -> Result<String, DomainError> {
        let token = authorization.strip_prefix("Bearer ").ok_or_else(|| {
            DomainError::Unauthorized("malformed authorization header".to_string())
        })?;

        validate_token(token.trim(), &self.jwt_secret).map_err(|e| {
            debug!(error = %e, "Token rejected");
            DomainError::Unauthorized("invalid or expired token".to_string())
        })
    }

    /// Allows only callers whose student record carries the admin role.
    #[instrument(skip(self))]
    pub async fn authorize_admin(&self, email: &str) -> Result<()> {
        match self.user_repository.find_user_by_email(email).await? {
            None => {
                warn!(email = email, "No student record for authenticated email");
                Err(DomainError::Forbidden("no user record for this identity".to_string()).into())
            }
            Some(user) if user.has_role(Role::Admin) => {
                debug!(user_id = %user.id, "Admin access granted");
                Ok(())
            }
            Some(user) => {
                warn!(user_id = %user.id, role = ?user.role, "Admin access denied");
                Err(DomainError::Forbidden("admin role required".to_string()).into())
            }
        }
    }

    /// Answers whether `target` holds `role`. Callers may only ask about themselves.
    #[instrument(skip(self))]
    pub async fn check_role(&self, caller_email: &str, target: &str, role: Role) -> Result<bool> {
        ensure_owner(caller_email, target)?;

        let has_role = self
            .user_repository
            .find_user_by_email(target)
            .await?
            .is_some_and(|user| user.has_role(role));

        debug!(role = role.as_str(), has_role = has_role, "Role check answered");
        Ok(has_role)
    }
}
