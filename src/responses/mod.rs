pub mod download;
pub mod errors;
pub mod html;
pub mod redirect;

pub use crate::errors::ResultResp;
pub use download::{csv_response, xlsx_response};
pub use errors::error_to_response;
pub use html::{html_response, html_status};
pub use redirect::{redirect, text_response};
