//! Authentication middleware and extractors.
//!
//! Provides extractors for requiring an owner session in route handlers.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tower_sessions::Session;

use crate::models::{CurrentOwner, session_keys};

/// Extractor that requires an authenticated business owner.
///
/// Rejects with a 401 JSON body when no owner session is present.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireOwner(owner): RequireOwner,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", owner.email)
/// }
/// ```
pub struct RequireOwner(pub CurrentOwner);

/// Error returned when authentication is required but no owner is logged in.
pub struct AuthRejection;

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Not authenticated"})),
        )
            .into_response()
    }
}

impl<S> FromRequestParts<S> for RequireOwner
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts.extensions.get::<Session>().ok_or(AuthRejection)?;

        let owner: CurrentOwner = session
            .get(session_keys::CURRENT_OWNER)
            .await
            .ok()
            .flatten()
            .ok_or(AuthRejection)?;

        Ok(Self(owner))
    }
}

/// Extractor that optionally gets the current owner.
///
/// Unlike `RequireOwner`, this does not reject the request when nobody is
/// logged in.
pub struct OptionalOwner(pub Option<CurrentOwner>);

impl<S> FromRequestParts<S> for OptionalOwner
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let owner = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<CurrentOwner>(session_keys::CURRENT_OWNER)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(owner))
    }
}

/// Helper to set the current owner in the session.
///
/// Cycles the session id first so an authenticated session never reuses a
/// pre-login id.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_owner(
    session: &Session,
    owner: &CurrentOwner,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_OWNER, owner).await
}

/// Helper to clear the current owner from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_owner(
    session: &Session,
) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentOwner>(session_keys::CURRENT_OWNER)
        .await?;
    Ok(())
}
