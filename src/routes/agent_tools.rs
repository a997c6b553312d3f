use super::views;
use crate::domain::PropertyStatus;
use crate::forms::parse_query;
use crate::responses::{html_response, ResultResp};
use crate::state::AppState;
use crate::templates::pages::{agent_tools_page, AgentToolsVm};
use astra::Request;
use tracing::debug;

/// Listing copy, social posts and share link for one property, picked by
/// `?id=`. Without one, the first complete property is shown.
pub fn page(req: &Request, state: &AppState) -> ResultResp {
    let params = parse_query(req.uri().query());
    let (properties, error) = match state.api.list_properties() {
        Ok(records) => (views(&records), None),
        Err(err) => (Vec::new(), Some(err)),
    };

    let selected = match params.get("id") {
        Some(id) => properties.iter().find(|p| p.id == id),
        None => properties
            .iter()
            .find(|p| p.status == PropertyStatus::Complete)
            .or(properties.first()),
    }
    .cloned();

    let link = selected.as_ref().and_then(|p| {
        state.api.shareable_link(&p.id).unwrap_or_else(|e| {
            debug!(property_id = %p.id, error = %e, "share link lookup failed");
            None
        })
    });

    html_response(agent_tools_page(&AgentToolsVm {
        properties,
        selected,
        link,
        error,
    }))
}
