//! Landing page handler.
//!
//! The page itself never waits on the API: data-bearing sections render
//! in their loading state and HTMX fetches the partials in `partials.rs`.

use askama::Template;
use axum::extract::State;
use axum::response::Html;
use chrono::Datelike;

use crate::SiteState;
use crate::content::{self, COMMAND_CATEGORIES, CommandCategory, FEATURES, Feature};
use crate::views::*;

pub(crate) fn render<T: Template>(tmpl: T) -> Html<String> {
    Html(tmpl.render().unwrap_or_else(|e| {
        format!("<pre>Template error: {e}</pre>")
    }))
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    bot_name: &'static str,
    tagline: &'static str,
    invite_url: &'static str,
    stats: ViewState<StatsView>,
    badge: ViewState<VersionBadgeView>,
    changelog: ViewState<ChangelogView>,
    features: &'static [Feature],
    command_categories: &'static [CommandCategory],
    show_creator_message: bool,
    year: i32,
}

pub async fn index(State(state): State<SiteState>) -> Html<String> {
    render(IndexTemplate {
        bot_name: content::BOT_NAME,
        tagline: content::TAGLINE,
        invite_url: content::INVITE_URL,
        stats: ViewState::Loading,
        badge: ViewState::Loading,
        changelog: ViewState::Loading,
        features: FEATURES,
        command_categories: COMMAND_CATEGORIES,
        show_creator_message: state.show_creator_message,
        year: chrono::Utc::now().year(),
    })
}
