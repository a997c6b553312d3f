// errors.rs

use astra::Response;

/// Errors that end a request with an error page rather than an inline
/// banner: unknown routes, unusable form submissions and export failures.
/// Backend failures are rendered inside the page and never reach here.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Bad Request: {0}")]
    Form(#[from] crate::forms::FormError),

    #[error("Request body is larger than {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("Spreadsheet Error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("CSV Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Internal Server Error")]
    InternalError,
}

impl ServerError {
    pub fn status(&self) -> u16 {
        match self {
            ServerError::NotFound => 404,
            ServerError::BadRequest(_) | ServerError::Form(_) => 400,
            ServerError::PayloadTooLarge { .. } => 413,
            ServerError::Xlsx(_) | ServerError::Csv(_) | ServerError::InternalError => 500,
        }
    }
}

// Type alias commonly used by route handlers.
pub type ResultResp = Result<Response, ServerError>;
