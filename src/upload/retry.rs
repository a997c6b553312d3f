use crate::api::models::Property;
use crate::api::{ApiError, PropertyApi};
use std::time::Duration;
use tracing::debug;

/// Attempts made when a freshly uploaded property is not visible yet.
pub const NOT_FOUND_ATTEMPTS: u32 = 3;
pub const NOT_FOUND_DELAY: Duration = Duration::from_secs(2);

/// Fetch a property, retrying only on 404. Any other error returns at once.
pub fn fetch_with_retry(
    api: &dyn PropertyApi,
    id: &str,
    attempts: u32,
    delay: Duration,
) -> Result<Property, ApiError> {
    let attempts = attempts.max(1);
    let mut attempt = 1;
    loop {
        match api.get_property(id) {
            Err(e) if e.is_not_found() && attempt < attempts => {
                debug!(property_id = id, attempt, "property not found yet, retrying");
                attempt += 1;
                std::thread::sleep(delay);
            }
            other => return other,
        }
    }
}
