use crate::errors::ServerError;
use crate::templates::components::error::error_page;
use astra::{Body, Response, ResponseBuilder};

/// Render a routing-level failure as a full error page.
pub fn error_to_response(err: ServerError) -> Response {
    let status = err.status();
    let message = match &err {
        ServerError::NotFound => "The page you were looking for does not exist.".to_string(),
        other => other.to_string(),
    };
    let html = error_page(status, &message).into_string();

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", "text/html; charset=utf-8")
        .body(Body::from(html.clone()))
        .unwrap_or_else(|_| Response::new(Body::from(html)))
}
