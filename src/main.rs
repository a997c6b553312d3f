use crate::config::Config;
use crate::router::serve;
use crate::state::AppState;
use astra::Server;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod api;
mod browse;
mod chat;
mod config;
mod domain;
mod errors;
mod forms;
mod responses;
mod router;
mod routes;
mod spreadsheets;
mod state;
mod templates;
mod upload;

#[cfg(test)]
mod tests;

fn main() {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("could not install tracing subscriber: {e}");
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("configuration error: {e}");
            std::process::exit(1);
        }
    };

    let state = match AppState::from_config(&config) {
        Ok(state) => state,
        Err(e) => {
            error!("could not create API client: {e}");
            std::process::exit(1);
        }
    };

    info!(
        bind = %config.bind,
        api = %config.api_url,
        workers = config.workers,
        authenticated = config.api_token.is_some(),
        "starting FloorIQ"
    );

    let server = Server::bind(&config.bind).max_workers(config.workers);

    if let Err(e) = server.serve(move |req, _info| serve(req, &state)) {
        error!("server ended with error: {e}");
    }

    info!("server shut down cleanly");
}
