use super::{header, is_htmx, read_body, read_form, MAX_UPLOAD_BYTES};
use crate::api::models::{FloorPlanUpload, ListingCopy, PropertyPatch};
use crate::api::ApiError;
use crate::domain::PropertyView;
use crate::forms::{multipart_boundary, parse_multipart, parse_query, FormData, FormError};
use crate::responses::{html_response, html_status, redirect, ResultResp};
use crate::state::AppState;
use crate::templates::pages::{
    new_property_page, progress_overlay, property_detail_page, property_unavailable_page, DetailVm,
};
use crate::upload::progress::ProgressSnapshot;
use crate::upload::retry::{fetch_with_retry, NOT_FOUND_ATTEMPTS};
use crate::upload::{spawn_watcher, validate_upload, ValidationError};
use astra::Request;
use maud::html;
use tracing::{debug, info, warn};

/// htmx stops polling when a response carries this status.
pub const STOP_POLLING: u16 = 286;

pub fn new_form() -> ResultResp {
    html_response(new_property_page("", None, None))
}

pub fn upload(mut req: Request, state: &AppState) -> ResultResp {
    let content_type = header(&req, "Content-Type").unwrap_or_default().to_string();
    let boundary = multipart_boundary(&content_type).ok_or(FormError::MissingBoundary)?;
    let body = read_body(&mut req, MAX_UPLOAD_BYTES)?;
    let form = parse_multipart(body, &boundary)?;

    let address = form.field("address").unwrap_or_default().to_string();
    let Some(file) = form.files.into_iter().find(|f| f.field == "file") else {
        return reject_upload(&address, ValidationError::MissingFile);
    };
    let mut upload = FloorPlanUpload {
        file_name: file.file_name,
        content_type: file.content_type,
        bytes: file.bytes,
        address: address.clone(),
    };
    if let Err(e) = validate_upload(&mut upload) {
        return reject_upload(&address, e);
    }

    let created = state.api.upload_floor_plan(&upload).and_then(|p| {
        if p.id.is_empty() {
            Err(ApiError::Decode("upload response carried no property id".into()))
        } else {
            Ok(p)
        }
    });
    match created {
        Ok(property) => {
            info!(property_id = %property.id, bytes = upload.bytes.len(), "floor plan uploaded");
            spawn_watcher(
                state.api.clone(),
                state.board.clone(),
                property.id.clone(),
                state.watch,
            );
            redirect(&format!("/properties/{}?showProgress=true", property.id))
        }
        Err(err) => html_response(new_property_page(&address, None, Some(&err))),
    }
}

fn reject_upload(address: &str, err: ValidationError) -> ResultResp {
    debug!(error = %err, "upload rejected");
    html_status(422, new_property_page(address, Some(&err.to_string()), None))
}

pub fn detail(req: &Request, state: &AppState, id: &str) -> ResultResp {
    let params = parse_query(req.uri().query());
    let show_progress = params.get("showProgress") == Some("true");
    let notice = params.get("notice").and_then(notice_text).map(String::from);
    render_detail(state, id, show_progress, notice, None)
}

fn notice_text(key: &str) -> Option<&'static str> {
    match key {
        "saved" => Some("Listing copy saved."),
        "shared" => Some("Share link is ready."),
        _ => None,
    }
}

/// Render the detail page. A just-uploaded property may not be readable
/// yet, so with `show_progress` a 404 is retried before giving up.
fn render_detail(
    state: &AppState,
    id: &str,
    show_progress: bool,
    notice: Option<String>,
    error: Option<ApiError>,
) -> ResultResp {
    let attempts = if show_progress { NOT_FOUND_ATTEMPTS } else { 1 };
    let record = match fetch_with_retry(state.api.as_ref(), id, attempts, state.retry_delay) {
        Ok(record) => record,
        Err(err) => {
            let status = if err.is_not_found() { 404 } else { 200 };
            return html_status(status, property_unavailable_page(id, &err));
        }
    };
    let property = PropertyView::from_record(&record);

    let overlay = if show_progress {
        overlay_for(state, &property)
    } else {
        None
    };
    let quality = if property.has_extraction() {
        state
            .api
            .quality_score(id)
            .map_err(|e| debug!(property_id = id, error = %e, "no quality score"))
            .ok()
    } else {
        None
    };
    // Only meaningful once a model has been trained; absent otherwise.
    let prediction = state
        .api
        .predict_price(id)
        .map_err(|e| debug!(property_id = id, error = %e, "no model prediction"))
        .ok();
    let link = state.api.shareable_link(id).unwrap_or_else(|e| {
        debug!(property_id = id, error = %e, "share link lookup failed");
        None
    });

    html_response(property_detail_page(&DetailVm {
        property,
        quality,
        prediction,
        link,
        overlay,
        poll_every: state.watch.interval,
        notice,
        error,
    }))
}

/// Snapshot for the overlay, or `None` once processing is over. A property
/// still processing with nobody watching it (e.g. after a restart) gets a
/// new watcher.
fn overlay_for(state: &AppState, property: &PropertyView) -> Option<ProgressSnapshot> {
    match state.board.snapshot(&property.id) {
        Some(snapshot) => (!snapshot.finished).then_some(snapshot),
        None if !property.status.is_terminal() => {
            spawn_watcher(
                state.api.clone(),
                state.board.clone(),
                property.id.clone(),
                state.watch,
            );
            state.board.snapshot(&property.id)
        }
        None => None,
    }
}

/// The overlay fragment, re-requested by htmx every poll interval.
pub fn progress(state: &AppState, id: &str) -> ResultResp {
    match state.board.snapshot(id) {
        Some(snapshot) if snapshot.finished => {
            // Last refresh this overlay will ask for.
            state.board.cancel(id);
            html_status(
                STOP_POLLING,
                progress_overlay(id, &snapshot, state.watch.interval),
            )
        }
        Some(snapshot) => html_response(progress_overlay(id, &snapshot, state.watch.interval)),
        // Nothing is being watched: remove the overlay and stop polling.
        None => html_status(STOP_POLLING, html! {}),
    }
}

pub fn dismiss_progress(req: &Request, state: &AppState, id: &str) -> ResultResp {
    if state.board.cancel(id) {
        info!(property_id = id, "progress overlay dismissed");
    }
    if is_htmx(req) {
        html_response(html! {})
    } else {
        redirect(&format!("/properties/{id}"))
    }
}

pub fn save_listing(mut req: Request, state: &AppState, id: &str) -> ResultResp {
    let form = read_form(&mut req)?;
    let patch = PropertyPatch {
        address: None,
        listing_copy: Some(listing_copy_from_form(&form)),
    };
    match state.api.update_property(id, &patch) {
        Ok(_) => redirect(&format!("/properties/{id}?notice=saved")),
        Err(err) => render_detail(state, id, false, None, Some(err)),
    }
}

/// Blank inputs become absent fields; highlights are one per line and
/// keywords comma separated.
pub fn listing_copy_from_form(form: &FormData) -> ListingCopy {
    let text = |key: &str| form.get(key).filter(|v| !v.is_empty()).map(String::from);
    let list = |key: &str, sep: char| -> Vec<String> {
        form.get(key)
            .unwrap_or_default()
            .split(sep)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    };
    ListingCopy {
        headline: text("headline"),
        description: text("description"),
        highlights: list("highlights", '\n'),
        call_to_action: text("call_to_action"),
        social_media_caption: text("social_media_caption"),
        email_subject: text("email_subject"),
        seo_keywords: list("seo_keywords", ','),
    }
}

pub fn enrich(state: &AppState, id: &str, again: bool) -> ResultResp {
    let result = if again {
        state.api.re_enrich(id)
    } else {
        state.api.enrich(id)
    };
    match result {
        Ok(()) => {
            info!(property_id = id, again, "enrichment requested");
            spawn_watcher(state.api.clone(), state.board.clone(), id.to_string(), state.watch);
            redirect(&format!("/properties/{id}?showProgress=true"))
        }
        Err(err) => render_detail(state, id, false, None, Some(err)),
    }
}

pub fn delete(state: &AppState, id: &str) -> ResultResp {
    match state.api.delete_property(id) {
        Ok(()) => {
            info!(property_id = id, "property deleted");
            state.board.cancel(id);
            redirect("/?notice=deleted")
        }
        Err(err) => render_detail(state, id, false, None, Some(err)),
    }
}

/// Reuse the active link when there is one, otherwise generate a new one.
pub fn share(mut req: Request, state: &AppState, id: &str) -> ResultResp {
    let form = read_form(&mut req)?;
    let existing = match state.api.shareable_link(id) {
        Ok(link) => link.filter(|l| l.is_active != Some(false) && l.share_url.is_some()),
        Err(err) => return render_detail(state, id, false, None, Some(err)),
    };
    if existing.is_none() {
        if let Err(err) = state.api.generate_link(id) {
            warn!(property_id = id, error = %err, "could not generate share link");
            return render_detail(state, id, false, None, Some(err));
        }
        info!(property_id = id, "share link generated");
    }

    match form.get("return_to") {
        Some(path) if is_local_path(path) => redirect(path),
        _ => redirect(&format!("/properties/{id}?notice=shared")),
    }
}

/// Only same-site absolute paths are followed after a form post.
fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//")
}
