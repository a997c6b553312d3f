use crate::errors::ServerError;
use crate::responses::{error_to_response, text_response, ResultResp};
use crate::routes::{agent_tools, analytics, lists, properties, report};
use crate::state::AppState;
use astra::{Request, Response};
use std::time::Instant;
use tracing::{error, info, warn};

/// Entry point for the server: dispatch, render failures as error pages and
/// log one line per request.
pub fn serve(req: Request, state: &AppState) -> Response {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let start = Instant::now();

    let resp = match handle(req, state) {
        Ok(resp) => resp,
        Err(err) => {
            if err.status() >= 500 {
                error!(method = %method, path = %path, error = %err, "request failed");
            } else {
                warn!(method = %method, path = %path, error = %err, "request rejected");
            }
            error_to_response(err)
        }
    };

    info!(
        method = %method,
        path = %path,
        status = resp.status().as_u16(),
        elapsed = ?start.elapsed(),
        "request"
    );
    resp
}

pub fn handle(req: Request, state: &AppState) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    match (method.as_str(), segments.as_slice()) {
        ("GET", []) => lists::dashboard(&req, state),
        ("GET", ["health"]) => text_response("ok"),

        ("GET", ["properties", "new"]) => properties::new_form(),
        ("POST", ["properties", "new"]) => properties::upload(req, state),
        ("POST", ["properties", "bulk"]) => lists::bulk(req, state),
        ("GET", ["properties", id]) => properties::detail(&req, state, id),
        ("GET", ["properties", id, "progress"]) => properties::progress(state, id),
        ("POST", ["properties", id, "progress"]) => properties::dismiss_progress(&req, state, id),
        ("POST", ["properties", id, "listing"]) => properties::save_listing(req, state, id),
        ("POST", ["properties", id, "enrich"]) => properties::enrich(state, id, false),
        ("POST", ["properties", id, "re-enrich"]) => properties::enrich(state, id, true),
        ("POST", ["properties", id, "delete"]) => properties::delete(state, id),
        ("POST", ["properties", id, "share"]) => properties::share(req, state, id),

        ("GET", ["data-studio"]) => lists::data_studio(&req, state),
        ("GET", ["data-studio", "export.csv"]) => lists::export_csv(&req, state),
        ("GET", ["data-studio", "export.xlsx"]) => lists::export_xlsx(&req, state),

        ("GET", ["analytics"]) => analytics::page(state),
        ("POST", ["analytics", "train"]) => analytics::train(req, state),
        ("GET", ["analytics", "sqft-impact"]) => analytics::sqft_impact(&req, state),

        ("GET", ["agent-tools"]) => agent_tools::page(&req, state),

        ("GET", ["report", token]) => report::page(&req, state, token),
        ("POST", ["report", token, "chat"]) => report::chat(req, state, token),

        _ => Err(ServerError::NotFound),
    }
}
