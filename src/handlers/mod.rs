// HTTP request handlers for the partner gateway
pub mod health;
pub mod login;

#[cfg(test)]
mod tests;

// Re-export the main handler functions
pub use health::health;
pub use login::{initiate_login, poll_login_status};

use actix_web::web;

/// Partner-facing route table, shared by the server binary and the test
/// suites.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg
        // Partner gateway endpoints
        .route("/partner/login/initiate", web::post().to(initiate_login))
        .route("/partner/login/status", web::post().to(poll_login_status))
        // Health endpoint
        .route("/ping", web::get().to(health));
}
