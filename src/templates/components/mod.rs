use crate::domain::insights::ScoreLevel;
use crate::domain::PropertyStatus;
use maud::{html, Markup};

pub mod error;
pub mod property_table;

pub use error::{api_error_banner, error_banner, notice_banner};
pub use property_table::property_table;

pub fn status_badge(status: &PropertyStatus) -> Markup {
    html! {
        span class=(status.badge_class()) { (status.label()) }
    }
}

/// `72 / 100 · Good`
pub fn score_badge(score: f64) -> Markup {
    let level = ScoreLevel::from_score(score);
    html! {
        span class=(level.css_class()) {
            strong { (score.round()) } " / 100 · " (level.label())
        }
    }
}

pub fn stat_card(label: &str, value: &str) -> Markup {
    html! {
        div class="stat-card" {
            div class="stat-label" { (label) }
            div class="stat-value" { (value) }
        }
    }
}

pub fn card(title: &str, body: Markup) -> Markup {
    html! {
        section class="card" {
            h2 { (title) }
            div class="card-body" {
                (body)
            }
        }
    }
}

pub fn empty_state(message: &str) -> Markup {
    html! {
        div class="empty-state" { p { (message) } }
    }
}
