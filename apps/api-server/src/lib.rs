//! # Zero API Server
//!
//! Library half of the server binary: configuration, state wiring and the
//! actix-web application. The binary only adds telemetry and the listener,
//! so tests can build the exact same application.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod state;
pub mod telemetry;

use actix_web::web;

pub use config::AppConfig;
pub use state::AppState;

/// Register shared state, extractor error handling and all routes.
///
/// ```ignore
/// App::new().configure(api_server::configure(state.clone()))
/// ```
pub fn configure(state: AppState) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(state));
        middleware::error::configure_extractors(cfg);
        handlers::configure_routes(cfg);
    }
}
