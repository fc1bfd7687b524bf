//! Authentication routes for registration and login.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use clinic_ims_core::auth::{UserType, hash_password, verify_password};
use clinic_ims_db::{UserRepository, entities::users, repositories::CreateUserInput};
use clinic_ims_shared::auth::{AuthResponse, LoginRequest, RegisterRequest, UserInfo};
use tracing::info;

use crate::AppState;
use crate::error::{error_response, internal_error};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

fn invalid_credentials() -> Response {
    error_response(
        StatusCode::BAD_REQUEST,
        "invalid_credentials",
        "Invalid credentials",
    )
}

fn user_info(user: users::Model) -> UserInfo {
    UserInfo {
        id: user.id,
        first_name: user.first_name,
        last_name: user.last_name,
        email: user.email,
        phone_number: user.phone_number,
        user_type: UserType::from(user.user_type).to_string(),
    }
}

/// Issues a token for `user` and builds the auth response body.
fn auth_response(state: &AppState, status: StatusCode, user: users::Model) -> Response {
    let user_type = UserType::from(user.user_type);
    match state
        .jwt_service
        .generate_access_token(user.id, user_type.as_str())
    {
        Ok(token) => (
            status,
            Json(AuthResponse {
                token,
                user: user_info(user),
            }),
        )
            .into_response(),
        Err(e) => internal_error("Failed to generate access token", &e),
    }
}

/// POST /auth/register - Create a user and return a token.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> impl IntoResponse {
    let Ok(user_type) = payload.user_type.parse::<UserType>() else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "User type must be ADMIN or MANAGER",
        );
    };

    let email = payload.email.trim().to_lowercase();
    let required = [
        ("firstName", payload.first_name.trim()),
        ("lastName", payload.last_name.trim()),
        ("email", email.as_str()),
        ("phoneNumber", payload.phone_number.trim()),
        ("password", payload.password.as_str()),
    ];
    if let Some((field, _)) = required.iter().find(|(_, value)| value.is_empty()) {
        return error_response(
            StatusCode::BAD_REQUEST,
            "validation_error",
            format!("{field} is required"),
        );
    }

    let user_repo = UserRepository::new((*state.db).clone());

    match user_repo.email_exists(&email).await {
        Ok(false) => {}
        Ok(true) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "user_exists",
                "User already exists",
            );
        }
        Err(e) => return internal_error("Database error during registration", &e),
    }

    let password_hash = match hash_password(&payload.password) {
        Ok(hash) => hash,
        Err(e) => return internal_error("Failed to hash password", &e),
    };

    let input = CreateUserInput {
        first_name: payload.first_name.trim().to_string(),
        last_name: payload.last_name.trim().to_string(),
        email,
        phone_number: payload.phone_number.trim().to_string(),
        password_hash,
        user_type: user_type.into(),
    };

    let user = match user_repo.create(input).await {
        Ok(user) => user,
        Err(e) => return internal_error("Failed to create user", &e),
    };

    info!(user_id = user.id, user_type = %user_type, "User registered");
    auth_response(&state, StatusCode::CREATED, user)
}

/// POST /auth/login - Authenticate a user and return a token.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());
    let email = payload.email.trim().to_lowercase();

    let user = match user_repo.find_by_email(&email).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            info!(email = %email, "Login attempt for non-existent user");
            return invalid_credentials();
        }
        Err(e) => return internal_error("Database error during login", &e),
    };

    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(user_id = user.id, "Failed login attempt - invalid password");
            return invalid_credentials();
        }
        Err(e) => return internal_error("Password verification error", &e),
    }

    info!(user_id = user.id, "User logged in successfully");
    auth_response(&state, StatusCode::OK, user)
}
