// responses/download.rs
use crate::errors::ServerError;
use crate::responses::ResultResp;
use astra::{Body, ResponseBuilder};

const XLSX_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// File download. `filename` is generated server-side and never needs escaping.
fn attachment(body: Body, content_type: &str, filename: &str) -> ResultResp {
    ResponseBuilder::new()
        .status(200)
        .header("Content-Type", content_type)
        .header(
            "Content-Disposition",
            format!("attachment; filename=\"{filename}\""),
        )
        .header("Cache-Control", "no-store")
        .body(body)
        .map_err(|_| ServerError::InternalError)
}

pub fn csv_response(csv: Vec<u8>, filename: &str) -> ResultResp {
    attachment(Body::from(csv), "text/csv; charset=utf-8", filename)
}

pub fn xlsx_response(buffer: Vec<u8>, filename: &str) -> ResultResp {
    attachment(Body::from(buffer), XLSX_TYPE, filename)
}
