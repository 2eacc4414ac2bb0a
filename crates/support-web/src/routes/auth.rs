//! Account endpoints: register, login, logout, current user.
//!
//! Phone numbers double as login names. Sessions are bearer tokens backed
//! by database rows, so logout revokes immediately.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use database::models::User;
use database::{session, user, validation};

use crate::error::{ApiError, Result};
use crate::extract::{self, AuthUser};
use crate::state::AppState;

/// Registration / login request body.
#[derive(Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub password: String,
}

/// User info returned to the frontend.
#[derive(Serialize)]
pub struct UserPayload {
    pub id: i64,
    pub phone: String,
    pub is_staff: bool,
    pub is_active: bool,
}

impl From<User> for UserPayload {
    fn from(user: User) -> Self {
        UserPayload {
            id: user.id,
            phone: user.phone,
            is_staff: user.is_staff,
            is_active: user.is_active,
        }
    }
}

/// Successful register/login response.
#[derive(Serialize)]
pub struct AuthResponse {
    pub ok: bool,
    pub token: String,
    pub user: UserPayload,
}

#[derive(Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

/// Current-user response; `ok` is false when nobody is logged in.
#[derive(Serialize)]
pub struct MeResponse {
    pub ok: bool,
    pub user: Option<UserPayload>,
}

/// Register a new account and log it in right away.
pub async fn register(
    State(state): State<AppState>,
    body: std::result::Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<AuthResponse>> {
    let creds = super::parse_body(body)?;
    let phone = creds.phone.trim().to_string();
    validation::validate_phone(&phone)?;
    validation::validate_password(&creds.password)?;

    let hash = extract::hash_password(&creds.password);
    let user = user::create_user(state.db.pool(), &phone, &hash, false).await?;
    let token = issue_session(&state, user.id).await?;

    info!(user_id = user.id, "User registered");
    Ok(Json(AuthResponse {
        ok: true,
        token,
        user: user.into(),
    }))
}

/// Log in with phone + password.
pub async fn login(
    State(state): State<AppState>,
    body: std::result::Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<AuthResponse>> {
    let creds = super::parse_body(body)?;
    let phone = creds.phone.trim().to_string();
    if phone.is_empty() || creds.password.is_empty() {
        return Err(ApiError::Validation(
            "phone and password are required".to_string(),
        ));
    }

    let Some(mut user) = user::get_by_phone(state.db.pool(), &phone).await? else {
        return Err(ApiError::InvalidCredentials);
    };
    if !extract::verify_password(&creds.password, &user.password_hash) {
        return Err(ApiError::InvalidCredentials);
    }
    if !user.is_active {
        return Err(ApiError::Forbidden("account disabled".to_string()));
    }

    // Configured admin phones pick up the staff capability on login
    if !user.is_staff && state.admin_phones.iter().any(|p| p == &phone) {
        user::set_staff(state.db.pool(), user.id, true).await?;
        user.is_staff = true;
    }

    let token = issue_session(&state, user.id).await?;
    info!(user_id = user.id, "User logged in");
    Ok(Json(AuthResponse {
        ok: true,
        token,
        user: user.into(),
    }))
}

/// Log out: drop the presented session, if any.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<OkResponse>> {
    if let Some(token) = extract::bearer_token(&headers) {
        session::delete(state.db.pool(), &token).await?;
    }
    Ok(Json(OkResponse { ok: true }))
}

/// Current user info. Anonymous callers get `{ok: false, user: null}`
/// with a 200, so the frontend can poll without error handling.
pub async fn me(
    State(state): State<AppState>,
    caller: Option<AuthUser>,
) -> Result<Json<MeResponse>> {
    match caller {
        Some(AuthUser(identity)) => {
            let user = user::get_user(state.db.pool(), identity.user_id).await?;
            Ok(Json(MeResponse {
                ok: true,
                user: Some(user.into()),
            }))
        }
        None => Ok(Json(MeResponse {
            ok: false,
            user: None,
        })),
    }
}

async fn issue_session(state: &AppState, user_id: i64) -> Result<String> {
    let token = extract::new_session_token();
    session::create(state.db.pool(), &token, user_id).await?;
    Ok(token)
}
