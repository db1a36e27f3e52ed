//! # MindStream API Server
//!
//! Serves blog posts and visitor presence from two JSON files.
//!
//! `api-server hash-password <password>` prints an Argon2 hash suitable for
//! `ADMIN_PASSWORD_HASH` and exits.

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

use config::AppConfig;
use observability::RequestIdMiddleware;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let mut args = std::env::args().skip(1);
    if args.next().as_deref() == Some("hash-password") {
        return print_password_hash(args.next());
    }

    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting MindStream API Server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new(&config).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to prepare data files");
        std::io::Error::other(e)
    })?;

    let cors_config = config.cors.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::cors::cors(&cors_config))
            .wrap(RequestIdMiddleware)
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .app_data(middleware::error::json_config())
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

fn print_password_hash(password: Option<String>) -> std::io::Result<()> {
    let Some(password) = password.filter(|p| !p.is_empty()) else {
        eprintln!("usage: api-server hash-password <password>");
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "missing password",
        ));
    };

    let hash = mindstream_infra::auth::hash_password(&password).map_err(std::io::Error::other)?;
    println!("{hash}");
    Ok(())
}
