use crate::api::ApiError;
use crate::templates::public_layout;
use maud::{html, Markup};

/// Inline banner for a failed backend call. A 401 is shown as a soft warning
/// with a retry hint; the user stays on the page.
pub fn api_error_banner(err: &ApiError) -> Markup {
    let class = if err.is_unauthorized() {
        "banner banner-warning"
    } else {
        "banner banner-error"
    };
    html! {
        div class=(class) role="alert" {
            p { (err.to_string()) }
            @if err.is_unauthorized() {
                p class="hint" { "Nothing was lost. Reload the page to try again." }
            }
        }
    }
}

pub fn error_banner(message: &str) -> Markup {
    html! {
        div class="banner banner-error" role="alert" { p { (message) } }
    }
}

pub fn notice_banner(message: &str) -> Markup {
    html! {
        div class="banner banner-success" role="status" { p { (message) } }
    }
}

/// Full page for routing-level failures.
pub fn error_page(status: u16, message: &str) -> Markup {
    public_layout(
        &format!("Error {status}"),
        html! {
            h1 { "Error " (status) }
            p { (message) }
            p { a href="/" { "← Back to dashboard" } }
        },
    )
}
