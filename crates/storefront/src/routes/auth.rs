//! Session logout.

use axum::response::Redirect;
use tower_sessions::Session;

use crate::error::{Result, clear_sentry_user};
use crate::session::logout as clear_demo_session;

/// Remove the session user and token, then return to the store.
pub async fn logout(session: Session) -> Result<Redirect> {
    clear_demo_session(&session).await?;
    clear_sentry_user();
    Ok(Redirect::to("/"))
}
