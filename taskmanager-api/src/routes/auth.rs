/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /register`: Create an account
/// - `POST /login`: Exchange credentials for a bearer token
///
/// # Example
///
/// ```text
/// POST /login
/// {"email": "lorem@ipsum.com", "password": "l0r3mIpsum"}
///
/// 200 OK
/// {"token": "eyJhbGciOiJIUzI1NiIs..."}
/// ```

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use taskmanager_shared::{
    services::RegisterUser,
    validation::user::{validate_login, validate_register, LoginRequest, RegisterRequest},
};

/// Body of simple acknowledgements
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Register handler
///
/// # Errors
///
/// - 422 if the body is malformed or fails validation
/// - 409 if the email is already registered
/// - 500 on storage failure
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Json(req) = payload?;

    let validation = validate_register(&req);
    if !validation.validated {
        return Err(ApiError::Unprocessable(validation.message));
    }

    let user = state
        .services
        .users
        .register(RegisterUser {
            name: req.name,
            email: req.email,
            password: req.password,
        })
        .await?;

    tracing::info!(user_id = user.id, "Registration completed");

    Ok(Json(MessageResponse {
        message: "successfully created user".to_string(),
    }))
}

/// Login handler
///
/// # Errors
///
/// - 422 if the body is malformed or fails validation
/// - 401 for an unknown email or a wrong password
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<TokenResponse>> {
    let Json(req) = payload?;

    let validation = validate_login(&req);
    if !validation.validated {
        return Err(ApiError::Unprocessable(validation.message));
    }

    let user = state.services.users.login(&req.email, &req.password).await?;
    let token = state.services.tokens.issue_token(&user)?;

    tracing::info!(user_id = user.id, "Login succeeded");

    Ok(Json(TokenResponse { token }))
}
