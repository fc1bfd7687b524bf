//! Authentication middleware and role gates.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use clinic_ims_core::auth::UserType;
use clinic_ims_db::UserRepository;
use clinic_ims_shared::Claims;
use tracing::{debug, warn};

use crate::AppState;
use crate::error::{error_response, internal_error};

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn unauthorized(error: &str, message: &str) -> Response {
    error_response(StatusCode::UNAUTHORIZED, error, message)
}

/// Authentication middleware that validates JWT tokens.
///
/// This middleware:
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Validates the token using the JWT service
/// 3. Checks that the user still exists and refreshes the user type from the store
/// 4. Stores the claims in request extensions for handlers to access
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return unauthorized("missing_token", "Not authorized, no token");
    };

    let mut claims = match state.jwt_service.validate_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            debug!(error = %e, "Rejected bearer token");
            return unauthorized("invalid_token", "Not authorized, token failed");
        }
    };

    let user_repo = UserRepository::new((*state.db).clone());
    match user_repo.find_by_id(claims.user_id()).await {
        Ok(Some(user)) => {
            claims.user_type = UserType::from(user.user_type).to_string();
        }
        Ok(None) => {
            warn!(user_id = claims.user_id(), "Token for deleted user");
            return unauthorized("user_not_found", "Not authorized, user not found");
        }
        Err(e) => return internal_error("Failed to load authenticated user", &e),
    }

    request.extensions_mut().insert(claims);
    next.run(request).await
}

/// Extractor for authenticated user claims.
///
/// Use this in handlers to get the authenticated user's claims:
///
/// ```ignore
/// async fn handler(auth: AuthUser) -> impl IntoResponse {
///     if let Err(response) = auth.require_catalog_admin() {
///         return response;
///     }
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Returns the user ID from the claims.
    #[must_use]
    pub const fn user_id(&self) -> i32 {
        self.0.user_id()
    }

    /// Returns the user type, if the claim holds a known one.
    #[must_use]
    pub fn user_type(&self) -> Option<UserType> {
        self.0.user_type().parse().ok()
    }

    /// Returns the inner claims.
    #[must_use]
    pub const fn claims(&self) -> &Claims {
        &self.0
    }

    /// Allows the request only for users who manage products and employees.
    ///
    /// # Errors
    ///
    /// Returns a 403 response otherwise.
    #[allow(clippy::result_large_err)]
    pub fn require_catalog_admin(&self) -> Result<(), Response> {
        self.require(UserType::can_manage_catalog, "Only admins can modify the catalog")
    }

    /// Allows the request only for users who post stock transactions.
    ///
    /// # Errors
    ///
    /// Returns a 403 response otherwise.
    #[allow(clippy::result_large_err)]
    pub fn require_transaction_poster(&self) -> Result<(), Response> {
        self.require(
            UserType::can_post_transactions,
            "Only admins and managers can post transactions",
        )
    }

    #[allow(clippy::result_large_err)]
    fn require(&self, allowed: fn(&UserType) -> bool, message: &str) -> Result<(), Response> {
        match self.user_type() {
            Some(user_type) if allowed(&user_type) => Ok(()),
            _ => {
                warn!(user_id = self.user_id(), user_type = %self.0.user_type(), "Role check failed");
                Err(error_response(StatusCode::FORBIDDEN, "forbidden", message))
            }
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| unauthorized("unauthorized", "Not authorized, no token"))
    }
}
