#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![deny(warnings)]
#![allow(clippy::multiple_crate_versions)]

use std::sync::Arc;
use std::time::Duration;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::anyhow;
use log::info;
use vaultlink::{
    handlers::configure_routes,
    relay::LoginRelay,
    settings::VaultlinkSettings,
    store::{MemoryStore, PartnerDirectory, SessionStore},
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from Settings.toml and environment variables
    // This also initializes the logger
    let settings =
        VaultlinkSettings::load().map_err(|e| anyhow!("Failed to load settings: {e}"))?;

    // Provision the store with the partner registrations from settings
    let store = Arc::new(MemoryStore::new());
    let partners = settings.registered_partners();
    for registration in &partners {
        store.register_partner(registration.clone()).await;
    }
    info!("provisioned {} partner registration(s)", partners.len());

    start_server(store, settings).await?;
    Ok(())
}

/// Start the partner gateway
///
/// # Errors
///
/// Returns an error if:
/// - Server binding fails
/// - Server fails to start
async fn start_server(store: Arc<MemoryStore>, settings: VaultlinkSettings) -> std::io::Result<()> {
    let bind_address = settings.get_bind_address();
    print_startup_info(&bind_address, &settings);

    let relay = LoginRelay::new(
        Arc::clone(&store) as Arc<dyn SessionStore>,
        Arc::clone(&store) as Arc<dyn PartnerDirectory>,
        settings.session.token_length,
        settings.session.ttl_seconds,
    );

    spawn_purge_sweep(Arc::clone(&store), settings.session.ttl_seconds);

    // Configure CORS for partner sites
    let cors_origins = settings.get_cors_origins();

    HttpServer::new(move || {
        let cors_origins = cors_origins.clone();
        let cors = Cors::default()
            .allowed_origin_fn(move |origin, _| {
                cors_origins
                    .iter()
                    .any(|allowed| allowed == origin.to_str().unwrap_or(""))
            })
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec!["Authorization", "Content-Type", "Accept"])
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(relay.clone()))
            .wrap(cors)
            .wrap(Logger::default())
            .configure(configure_routes)
    })
    .bind(&bind_address)?
    .run()
    .await
}

/// Periodically drop expired unresolved sessions. A TTL of zero preserves
/// the legacy behavior where pending sessions live forever.
fn spawn_purge_sweep(store: Arc<MemoryStore>, ttl_seconds: u64) {
    if ttl_seconds == 0 {
        return;
    }

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(ttl_seconds.max(60)));
        loop {
            interval.tick().await;
            if let Err(err) = store.purge_expired(ttl_seconds).await {
                log::warn!("purge sweep failed: {err}");
            }
        }
    });
}

fn print_startup_info(bind_address: &str, settings: &VaultlinkSettings) {
    println!("Starting Vaultlink QR Login Relay on http://{bind_address}");
    println!();
    println!("Partner gateway endpoints:");
    println!("  POST /partner/login/initiate - Create a login session and QR code");
    println!("  POST /partner/login/status   - Poll a session's outcome");
    println!();
    println!("System endpoints:");
    println!("  GET  /ping            - Health check");
    println!();
    println!(
        "Session tokens: {} chars, TTL: {}",
        settings.session.token_length,
        if settings.session.ttl_seconds == 0 {
            "disabled".to_string()
        } else {
            format!("{}s", settings.session.ttl_seconds)
        }
    );
}
