pub mod config;
pub mod database;
pub mod error;
pub mod fairings;
pub mod models;
pub mod routes;
pub mod schema;
pub mod services;
pub mod state;

use log::warn;
use rocket::Config;
use rocket_cors::{AllowedOrigins, CorsOptions};
use std::sync::Arc;

pub use config::AppConfig;
pub use error::{ApiError, JournalError};
pub use fairings::RequestLogger;
pub use services::{DatabaseService, JournalService, LogRefresh, RecordingRefresh, RefreshSink};
pub use state::AppState;

pub fn create_rocket() -> rocket::Rocket<rocket::Build> {
    // Load configuration from environment
    let config = AppConfig::from_env();

    let database = match &config.database_url {
        Some(url) => Some(Arc::new(
            DatabaseService::new(url).expect("Failed to initialize database"),
        )),
        None => {
            warn!("Starting without a database");
            None
        }
    };

    let journal = Arc::new(JournalService::new(database, Arc::new(LogRefresh)));

    build_rocket(AppState { config, journal })
}

/// Assembles the server around an already constructed state
pub fn build_rocket(state: AppState) -> rocket::Rocket<rocket::Build> {
    let cors = CorsOptions::default()
        .allowed_origins(AllowedOrigins::all())
        .to_cors()
        .expect("Failed to create CORS configuration");

    let rocket_config = Config {
        port: state.config.port,
        address: state.config.host.parse().expect("Invalid host address"),
        ..Config::default()
    };

    let debug_endpoints = state.config.debug_endpoints;

    let rocket = rocket::custom(&rocket_config)
        .manage(state)
        .attach(cors)
        .attach(RequestLogger)
        .mount("/", routes::get_routes())
        .register("/", routes::get_catchers());

    if debug_endpoints {
        rocket.mount("/", routes::get_debug_routes())
    } else {
        rocket
    }
}
