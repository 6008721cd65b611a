//! Handlers for the `/auth` resource (register, login, Google sign-in, me).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use labstock_core::error::CoreError;
use labstock_core::roles::Role;
use labstock_db::models::user::{CreateUser, User, UserResponse};
use labstock_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};

use crate::auth::google::{verify_id_token, GoogleAuthError};
use crate::auth::jwt::generate_token;
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`. Fields are optional so missing
/// values surface as 400s with a message rather than deserialization errors.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request body for `POST /auth/google`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleLoginRequest {
    pub id_token: Option<String>,
}

/// Successful authentication response returned by register, login, and
/// Google sign-in.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
}

/// Response for `GET /auth/me`.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /auth/register
///
/// Create a password account. New accounts start as STUDENT; elevated roles
/// are assigned by an administrator out of band.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    // 1. Validate input shape.
    let email = input
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .ok_or_else(|| AppError::Core(CoreError::Validation("email is required".into())))?;
    let password = input
        .password
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::Core(CoreError::Validation("password is required".into())))?;
    validate_password_strength(password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    // 2. Reject duplicate emails before writing.
    if UserRepo::find_by_email(&state.pool, email).await?.is_some() {
        return Err(AppError::Core(CoreError::Validation(
            "Email is already registered".into(),
        )));
    }

    // 3. Hash and insert.
    let hashed = hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    let name = input
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        // Default the display name to the email's local part.
        .unwrap_or_else(|| email.split('@').next().unwrap_or(email).to_string());

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email: email.to_string(),
            password_hash: Some(hashed),
            name,
            role: Role::Student.as_str().to_string(),
            google_id: None,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "Registered new account");
    let response = auth_response(&state, &user)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /auth/login
///
/// Authenticate with email + password. Google-only accounts (no password
/// hash) are rejected the same way as a wrong password.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let email = input
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .ok_or_else(|| AppError::Core(CoreError::Validation("email is required".into())))?;
    let password = input
        .password
        .as_deref()
        .ok_or_else(|| AppError::Core(CoreError::Validation("password is required".into())))?;

    let user = UserRepo::find_by_email(&state.pool, email)
        .await?
        .ok_or_else(invalid_credentials)?;

    // A Google-only account has no hash to check against.
    let hash = user.password_hash.as_deref().ok_or_else(invalid_credentials)?;

    let password_valid = verify_password(password, hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(invalid_credentials());
    }

    let response = auth_response(&state, &user)?;
    Ok(Json(response))
}

/// POST /auth/google
///
/// Sign in with a Google ID token. First sign-in provisions a quarantined
/// PENDING account; an existing password account with the same email is
/// linked to the Google identity instead of duplicated.
pub async fn google_login(
    State(state): State<AppState>,
    Json(input): Json<GoogleLoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let id_token = input
        .id_token
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Core(CoreError::Validation("idToken is required".into())))?;

    let client_id = state.config.google_client_id.as_deref().ok_or_else(|| {
        AppError::InternalError("GOOGLE_CLIENT_ID is not configured".to_string())
    })?;

    let identity = verify_id_token(&state.http, id_token, client_id)
        .await
        .map_err(|e| match e {
            GoogleAuthError::Invalid(msg) => AppError::Core(CoreError::Unauthorized(msg)),
            GoogleAuthError::Network(err) => {
                AppError::InternalError(format!("Google verification failed: {err}"))
            }
        })?;

    // 1. Known Google identity: straight sign-in.
    if let Some(user) = UserRepo::find_by_google_id(&state.pool, &identity.sub).await? {
        let response = auth_response(&state, &user)?;
        return Ok(Json(response));
    }

    // 2. Same email already registered with a password: link the identity.
    if let Some(existing) = UserRepo::find_by_email(&state.pool, &identity.email).await? {
        let user = UserRepo::link_google_id(&state.pool, existing.id, &identity.sub)
            .await?
            .ok_or_else(|| {
                AppError::InternalError("User disappeared during Google linking".to_string())
            })?;
        tracing::info!(user_id = user.id, "Linked Google identity to existing account");
        let response = auth_response(&state, &user)?;
        return Ok(Json(response));
    }

    // 3. First sign-in: provision a quarantined account.
    let name = identity
        .name
        .clone()
        .unwrap_or_else(|| identity.email.split('@').next().unwrap_or("user").to_string());
    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email: identity.email.clone(),
            password_hash: None,
            name,
            role: Role::Pending.as_str().to_string(),
            google_id: Some(identity.sub.clone()),
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "Provisioned account from Google sign-in");
    let response = auth_response(&state, &user)?;
    Ok(Json(response))
}

/// GET /auth/me
///
/// Return the caller's own record. Deliberately reachable by PENDING-role
/// accounts so a quarantined user can see their state.
pub async fn me(auth_user: AuthUser) -> AppResult<Json<MeResponse>> {
    Ok(Json(MeResponse {
        user: UserResponse::from(&auth_user.user),
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
}

/// Issue a token for `user` and build the shared auth response.
fn auth_response(state: &AppState, user: &User) -> Result<AuthResponse, AppError> {
    let token = generate_token(user.id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    Ok(AuthResponse {
        user: UserResponse::from(user),
        token,
    })
}
