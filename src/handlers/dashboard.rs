use askama::Template;
use axum::{
  extract::{Query, State},
  response::Html,
};

use super::{Notice, NoticeQuery};
use crate::domain::DashboardSummary;
use crate::filters;
use crate::identity::Visitor;
use crate::state::AppState;

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
  pub visitor: Visitor,
  pub notice: Option<Notice>,
  /// `None` until the visitor has entered a name
  pub summary: Option<DashboardSummary>,
}

pub async fn dashboard(
  State(state): State<AppState>,
  visitor: Visitor,
  Query(query): Query<NoticeQuery>,
) -> Html<String> {
  let summary = match visitor.name() {
    Some(name) => {
      let progress = state.catalog.get_user_progress(name).await;
      let favorites = state.catalog.get_user_favorites(name).await;
      let achievements = state.catalog.get_user_achievements(name).await;
      let courses = state.catalog.get_courses().await;
      Some(DashboardSummary::build(&progress, &courses, &favorites, achievements))
    }
    None => None,
  };

  let template = DashboardTemplate {
    visitor,
    notice: query.notice(),
    summary,
  };
  Html(template.render().unwrap_or_default())
}
