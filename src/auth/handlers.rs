//! Admin login and logout.

use askama::Template;
use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;

use super::middleware::AdminContext;
use crate::config::ADMIN_SESSION_COOKIE;
use crate::filters;
use crate::identity::Visitor;
use crate::state::AppState;

#[derive(Template)]
#[template(path = "admin/login.html")]
pub struct LoginTemplate {
    pub visitor: Visitor,
    pub error: Option<String>,
    pub email: String,
}

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Login form, shown by GET /admin when no session is present
pub fn login_page(visitor: Visitor, error: Option<&str>, email: &str) -> Html<String> {
    let template = LoginTemplate {
        visitor,
        error: error.map(str::to_string),
        email: email.to_string(),
    };
    Html(template.render().unwrap_or_default())
}

/// POST /admin/login - Check credentials and start a session
pub async fn login_submit(
    State(state): State<AppState>,
    visitor: Visitor,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    let email = form.email.trim().to_lowercase();

    if email.is_empty() || form.password.is_empty() {
        return login_page(visitor, Some("Please fill in all fields"), &email).into_response();
    }

    if !state.verifier.verify(&email, &form.password).await {
        tracing::info!("Failed admin login for {}", email);
        return login_page(visitor, Some("Invalid email or password"), &email).into_response();
    }

    let session_id = state.sessions.create(&email);
    tracing::info!("Admin {} logged in", email);

    let lifetime = state.sessions.lifetime();
    let session_cookie = Cookie::build((ADMIN_SESSION_COOKIE, session_id))
        .path("/")
        .http_only(true)
        .secure(false) // Set to true in production with HTTPS
        .max_age(time::Duration::seconds(lifetime.num_seconds()))
        .build();

    (jar.add(session_cookie), Redirect::to("/admin?notice=welcome")).into_response()
}

/// POST /admin/logout - Drop the session and the cookie
pub async fn logout(
    State(state): State<AppState>,
    admin: AdminContext,
    jar: CookieJar,
) -> impl IntoResponse {
    state.sessions.remove(&admin.session_id);
    tracing::info!("Admin {} logged out", admin.email);
    (
        jar.remove(Cookie::build(ADMIN_SESSION_COOKIE).path("/")),
        Redirect::to("/admin"),
    )
}
