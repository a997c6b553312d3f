use super::models::ErrorBody;

/// Failures talking to the FloorIQ backend.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    /// 401. Shown as a soft "try again later" state; never forces a logout.
    #[error("Your session may have expired. Please try again in a moment.")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    /// 410, used for expired shareable links.
    #[error("Expired: {0}")]
    Gone(String),

    #[error("Request failed ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Map a non-success status and its body onto the taxonomy.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = error_message(body).unwrap_or_else(|| default_message(status));
        match status {
            401 => ApiError::Unauthorized,
            404 => ApiError::NotFound(message),
            410 => ApiError::Gone(message),
            _ => ApiError::Rejected { status, message },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

fn error_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed
        .message
        .or(parsed.error)
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
}

fn default_message(status: u16) -> String {
    match status {
        404 => "the requested resource does not exist".into(),
        410 => "this link is no longer available".into(),
        _ => format!("backend returned HTTP {status}"),
    }
}
