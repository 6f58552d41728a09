//! Session extractors.
//!
//! Provides the per-request [`SessionContext`] to route handlers.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;
use tracing::Span;

use crate::session::SessionContext;

/// Extractor that loads the session user and token once per request.
///
/// Requests without a session (no session layer, or a store failure) get an
/// anonymous context. The user id, when present, is recorded on the current
/// span as `user_id`.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(CurrentSession(ctx): CurrentSession) -> impl IntoResponse {
///     match ctx.user() {
///         Some(user) => format!("Hello, {}!", user.name.as_deref().unwrap_or("shopper")),
///         None => "Hello, guest!".to_string(),
///     }
/// }
/// ```
pub struct CurrentSession(pub SessionContext);

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ctx = match parts.extensions.get::<Session>() {
            Some(session) => SessionContext::load(session).await,
            None => SessionContext::anonymous(),
        };

        if let Some(id) = ctx.user().and_then(|user| user.id) {
            Span::current().record("user_id", id.as_i32());
        }

        Ok(Self(ctx))
    }
}
