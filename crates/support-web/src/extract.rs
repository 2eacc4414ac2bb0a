//! Session authentication: extractors and credential helpers.
//!
//! The two extractors are the whole access gate. `AuthUser` admits any
//! logged-in caller; `StaffUser` additionally requires the staff
//! capability. Both are pure lookups with no side effects.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, HeaderMap};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use database::models::Identity;
use database::session;

use crate::error::ApiError;
use crate::state::AppState;

/// An authenticated caller. Any logged-in identity passes.
pub struct AuthUser(pub Identity);

/// An authenticated caller holding the staff capability.
pub struct StaffUser(pub Identity);

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(ApiError::Unauthenticated)?;
        let identity = session::identity(state.db.pool(), &token).await?;
        identity.map(AuthUser).ok_or(ApiError::Unauthenticated)
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for StaffUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(identity) = AuthUser::from_request_parts(parts, state).await?;
        if !identity.is_staff {
            return Err(ApiError::Forbidden("staff permission required".to_string()));
        }
        Ok(StaffUser(identity))
    }
}

/// Pull the session token out of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = auth.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Mint a fresh opaque session token.
pub fn new_session_token() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Hash a password with a random salt, stored as `salt$hex`.
pub fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    format!("{salt}${}", digest(&salt, password))
}

/// Check a password against a stored `salt$hex` value.
pub fn verify_password(password: &str, stored: &str) -> bool {
    match stored.split_once('$') {
        Some((salt, hash)) => digest(salt, password) == hash,
        None => false,
    }
}

fn digest(salt: &str, password: &str) -> String {
    let digest = Sha256::digest(format!("{salt}{password}").as_bytes());
    format!("{:x}", digest)
}
