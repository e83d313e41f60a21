//! Admin extractors.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;

use crate::config::ADMIN_SESSION_COOKIE;
use crate::state::AppState;

/// Logged-in admin.
/// Add this as a handler parameter to require an admin session.
/// Redirects to /admin (the login form) when absent or expired.
#[derive(Debug, Clone)]
pub struct AdminContext {
    pub email: String,
    pub session_id: String,
}

impl FromRequestParts<AppState> for AdminContext {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_request_parts(parts, state)
            .await
            .map_err(|_| Redirect::to("/admin").into_response())?;

        let session_id = jar
            .get(ADMIN_SESSION_COOKIE)
            .map(|c| c.value().to_string())
            .ok_or_else(|| Redirect::to("/admin").into_response())?;

        let session = state
            .sessions
            .get(&session_id)
            .ok_or_else(|| Redirect::to("/admin").into_response())?;

        Ok(AdminContext {
            email: session.email,
            session_id,
        })
    }
}

/// Optional admin extractor.
/// Returns Some(AdminContext) if logged in, None otherwise.
pub struct OptionalAdmin(pub Option<AdminContext>);

impl FromRequestParts<AppState> for OptionalAdmin {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match AdminContext::from_request_parts(parts, state).await {
            Ok(admin) => Ok(OptionalAdmin(Some(admin))),
            Err(_) => Ok(OptionalAdmin(None)),
        }
    }
}
