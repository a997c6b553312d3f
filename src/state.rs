use crate::api::{ApiClient, ApiError, PropertyApi};
use crate::browse::group::{ExtractedNeighborhoods, NeighborhoodLookup};
use crate::config::Config;
use crate::upload::retry::NOT_FOUND_DELAY;
use crate::upload::{ProgressBoard, WatchConfig};
use std::sync::Arc;
use std::time::Duration;

/// Shared by every worker thread. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn PropertyApi>,
    pub board: ProgressBoard,
    pub neighborhoods: Arc<dyn NeighborhoodLookup>,
    pub watch: WatchConfig,
    /// Delay between attempts when a fresh upload is not visible yet.
    pub retry_delay: Duration,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let client = ApiClient::new(
            config.api_url.clone(),
            config.api_token.clone(),
            config.http_timeout,
        )?;
        let mut state = Self::with_api(Arc::new(client));
        state.watch = WatchConfig {
            interval: config.poll_interval,
            timeout: config.poll_timeout,
        };
        Ok(state)
    }

    pub fn with_api(api: Arc<dyn PropertyApi>) -> Self {
        AppState {
            api,
            board: ProgressBoard::default(),
            neighborhoods: Arc::new(ExtractedNeighborhoods),
            watch: WatchConfig {
                interval: Duration::from_secs(crate::config::defaults::POLL_INTERVAL_SECS),
                timeout: Duration::from_secs(crate::config::defaults::POLL_TIMEOUT_SECS),
            },
            retry_delay: NOT_FOUND_DELAY,
        }
    }
}
