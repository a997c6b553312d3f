use super::{header, read_form};
use crate::api::models::ViewLog;
use crate::api::ApiError;
use crate::chat::ChatSession;
use crate::domain::PropertyView;
use crate::responses::{html_response, html_status, ResultResp};
use crate::state::AppState;
use crate::templates::components::api_error_banner;
use crate::templates::pages::{chat_messages, public_report_page, report_unavailable_page};
use astra::Request;
use maud::html;
use tracing::{info, warn};

/// Public, unauthenticated report behind a share token. Each view is logged
/// with the backend; a failed log never blocks the page.
pub fn page(req: &Request, state: &AppState, token: &str) -> ResultResp {
    let report = match state.api.public_report(token) {
        Ok(report) => report,
        Err(err) => return unavailable(&err),
    };

    let view = ViewLog {
        user_agent: header(req, "User-Agent").map(String::from),
        referrer: header(req, "Referer").map(String::from),
    };
    match state.api.log_view(token, &view) {
        Ok(()) => info!(token, "public report viewed"),
        Err(e) => warn!(token, error = %e, "could not log report view"),
    }

    let property = PropertyView::from_record(&report.property);
    html_response(public_report_page(token, &property, report.token_info.as_ref()))
}

fn unavailable(err: &ApiError) -> ResultResp {
    match err {
        ApiError::NotFound(_) => html_status(
            404,
            report_unavailable_page("Report not found", "This link is not valid. Ask the agent who shared it for a new one."),
        ),
        ApiError::Gone(_) => html_status(
            410,
            report_unavailable_page("This link has expired", "Shared reports are available for a limited time. Ask the agent for a fresh link."),
        ),
        other => html_response(report_unavailable_page("Report unavailable", &other.to_string())),
    }
}

/// One chat exchange, appended to the log by htmx.
pub fn chat(mut req: Request, state: &AppState, token: &str) -> ResultResp {
    let form = read_form(&mut req)?;
    let question = form.get("question").unwrap_or_default();
    if question.is_empty() {
        return html_response(html! {});
    }

    let report = match state.api.public_report(token) {
        Ok(report) => report,
        Err(err) => return html_response(api_error_banner(&err)),
    };
    let property = PropertyView::from_record(&report.property);

    let mut session = ChatSession::default();
    session.ask(question, &property);
    html_response(chat_messages(&session.messages))
}
