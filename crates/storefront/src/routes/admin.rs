//! Admin area entry point.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::gate::GateState;
use crate::models::StoredUser;
use crate::services::DashboardSummary;
use crate::state::AppState;

/// Admin dashboard payload.
#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub user: StoredUser,
    pub summary: DashboardSummary,
}

/// Run the admin gate for this client and show the dashboard or redirect to
/// `/unauthorized?reason=...`.
#[instrument(skip_all)]
pub async fn dashboard(State(state): State<AppState>, session: Session) -> Result<Response> {
    let mut gate = state.admin_gate();

    match gate.check(&session).await {
        GateState::Granted(user) => {
            let summary = state.catalog()?.dashboard_summary();
            let view = DashboardView {
                user: user.clone(),
                summary,
            };
            Ok(Json(view).into_response())
        }
        GateState::Denied(reason) => {
            add_breadcrumb("auth", "Admin gate denied", Some(&[("reason", reason.as_str())]));
            Ok(Redirect::to(&format!("/unauthorized?reason={reason}")).into_response())
        }
        GateState::Checking => Err(AppError::Internal(
            "admin gate did not resolve".to_string(),
        )),
    }
}
