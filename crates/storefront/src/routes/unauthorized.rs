//! Unauthorized page and demo session controls.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    response::Redirect,
};
use bazaar_core::Email;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::error::{Result, set_sentry_user};
use crate::gate::DenialReason;
use crate::models::StoredUser;
use crate::session::{login_as_regular_user, simulate_admin_access};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct UnauthorizedQuery {
    pub reason: Option<DenialReason>,
}

/// Something the visitor can do from the unauthorized page.
#[derive(Debug, Serialize)]
pub struct PageAction {
    pub label: &'static str,
    pub method: &'static str,
    pub href: &'static str,
}

#[derive(Debug, Serialize)]
pub struct UnauthorizedView {
    pub reason: DenialReason,
    pub message: &'static str,
    pub actions: Vec<PageAction>,
}

const ACTIONS: [PageAction; 3] = [
    PageAction {
        label: "Simulate admin access",
        method: "POST",
        href: "/unauthorized/simulate-admin",
    },
    PageAction {
        label: "Continue as regular user",
        method: "POST",
        href: "/unauthorized/simulate-user",
    },
    PageAction {
        label: "Back to store",
        method: "GET",
        href: "/",
    },
];

/// Explain why the admin gate refused entry.
pub async fn show(
    query: std::result::Result<Query<UnauthorizedQuery>, QueryRejection>,
) -> Result<Json<UnauthorizedView>> {
    let Query(query) = query?;
    let reason = query.reason.unwrap_or(DenialReason::AuthenticationRequired);
    Ok(Json(UnauthorizedView {
        reason,
        message: reason.message(),
        actions: ACTIONS.into(),
    }))
}

fn track_user(user: &StoredUser) {
    if let Some(id) = user.id {
        set_sentry_user(&id, user.email.as_ref().map(Email::as_str));
    }
}

/// Write a demo admin session and go to the admin area.
pub async fn simulate_admin(State(state): State<AppState>, session: Session) -> Result<Redirect> {
    let user = simulate_admin_access(&session, Utc::now(), state.config().session_ttl).await?;
    track_user(&user);
    Ok(Redirect::to("/admin"))
}

/// Write a demo shopper session and go back to the store.
pub async fn simulate_user(State(state): State<AppState>, session: Session) -> Result<Redirect> {
    let user = login_as_regular_user(&session, Utc::now(), state.config().session_ttl).await?;
    track_user(&user);
    Ok(Redirect::to("/"))
}
