use askama::Template;
use axum::{
  extract::{Query, State},
  response::{Html, IntoResponse, Response},
  Form,
};
use axum_extra::extract::CookieJar;

use super::{redirect_with, Notice, NoticeQuery, SelectOption};
use crate::filters;
use crate::identity::{self, Visitor};
use crate::state::AppState;
use crate::support::{SupportForm, SupportKind};

#[derive(Template)]
#[template(path = "support.html")]
pub struct SupportTemplate {
  pub visitor: Visitor,
  pub notice: Option<Notice>,
  pub error: Option<String>,
  pub form: SupportForm,
}

impl SupportTemplate {
  pub fn kind_options(&self) -> Vec<SelectOption> {
    SelectOption::list(SupportKind::ALL.iter().map(|k| k.as_str()), &self.form.kind)
  }
}

fn render(visitor: Visitor, notice: Option<Notice>, error: Option<String>, form: SupportForm) -> Html<String> {
  let template = SupportTemplate {
    visitor,
    notice,
    error,
    form,
  };
  Html(template.render().unwrap_or_default())
}

/// GET /support - Also issues the client cookie so the first POST carries it
pub async fn support_page(
  visitor: Visitor,
  jar: CookieJar,
  Query(query): Query<NoticeQuery>,
) -> (CookieJar, Html<String>) {
  let (jar, _) = identity::client_key(jar);
  let form = SupportForm {
    name: visitor.name().unwrap_or_default().to_string(),
    ..Default::default()
  };
  (jar, render(visitor, query.notice(), None, form))
}

/// POST /support - Validate and relay; errors re-render with the input kept
pub async fn support_submit(
  State(state): State<AppState>,
  visitor: Visitor,
  jar: CookieJar,
  Form(form): Form<SupportForm>,
) -> Response {
  let (jar, key) = identity::client_key(jar);
  let keys = [key, form.email.trim().to_lowercase()];

  match state.support.submit(&keys, &form).await {
    Ok(message) => {
      tracing::info!("Support request '{}' relayed for {}", message.subject, message.email);
      (jar, redirect_with("/support", Notice::SupportSent)).into_response()
    }
    Err(e) => (jar, render(visitor, None, Some(e.to_string()), form)).into_response(),
  }
}
