//! Request handlers, one module per area of the app. Each handler fetches
//! what it needs from the backend, renders, and turns backend failures into
//! inline banners.

pub mod agent_tools;
pub mod analytics;
pub mod lists;
pub mod properties;
pub mod report;

use crate::api::models::Property;
use crate::domain::PropertyView;
use crate::errors::ServerError;
use crate::forms::FormData;
use astra::Request;
use std::io::Read;

/// Ordinary urlencoded forms.
pub const MAX_FORM_BYTES: usize = 1024 * 1024;

/// Multipart uploads. Larger than the file limit so oversized files are
/// read whole and rejected with their real size.
pub const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

pub fn read_body(req: &mut Request, limit: usize) -> Result<Vec<u8>, ServerError> {
    let mut bytes = Vec::new();
    req.body_mut()
        .reader()
        .take(limit as u64 + 1)
        .read_to_end(&mut bytes)
        .map_err(|e| ServerError::BadRequest(format!("could not read request body: {e}")))?;
    if bytes.len() > limit {
        return Err(ServerError::PayloadTooLarge { limit });
    }
    Ok(bytes)
}

pub fn read_form(req: &mut Request) -> Result<FormData, ServerError> {
    Ok(FormData::parse(&read_body(req, MAX_FORM_BYTES)?))
}

pub fn query_string(req: &Request) -> &str {
    req.uri().query().unwrap_or_default()
}

pub fn header<'a>(req: &'a Request, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

/// Requests issued by htmx get fragments instead of redirects.
pub fn is_htmx(req: &Request) -> bool {
    header(req, "HX-Request") == Some("true")
}

pub fn views(records: &[Property]) -> Vec<PropertyView> {
    records.iter().map(PropertyView::from_record).collect()
}
