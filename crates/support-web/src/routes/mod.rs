//! Route handlers for the support chat API.

pub mod auth;
pub mod health;
pub mod support;

use axum::extract::rejection::JsonRejection;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::error::{ApiError, Result};
use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health))
        // Accounts
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        // Customer side
        .route("/api/customer/conversation", get(support::my_conversation))
        .route(
            "/api/customer/messages",
            get(support::my_messages).post(support::my_send),
        )
        // Staff side
        .route(
            "/api/admin/customer/conversations",
            get(support::staff_conversations),
        )
        .route(
            "/api/admin/customer/messages/:id",
            get(support::staff_messages).post(support::staff_send),
        )
}

/// Unwrap a JSON body, turning axum's rejection into the standard error
/// envelope instead of its default response.
pub(crate) fn parse_body<T>(body: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(ApiError::Validation(format!(
            "request body must be JSON: {rejection}"
        ))),
    }
}
