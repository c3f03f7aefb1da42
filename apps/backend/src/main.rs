use actix_web::{web, App, HttpServer};
use shed_backend::config::{DbProfile, GameConfig};
use shed_backend::infra::state::build_state;
use shed_backend::middleware::cors::cors_middleware;
use shed_backend::middleware::structured_logger::StructuredLogger;
use shed_backend::{routes, spawn_watchdog, telemetry};
use tracing::{error, info};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    let host = std::env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = match std::env::var("BACKEND_PORT")
        .unwrap_or_else(|_| "4000".to_string())
        .parse::<u16>()
    {
        Ok(port) => port,
        Err(_) => {
            error!("BACKEND_PORT must be a valid port number");
            std::process::exit(1);
        }
    };

    let config = match GameConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid game configuration");
            std::process::exit(1);
        }
    };
    let db_profile = match DbProfile::from_env() {
        Ok(profile) => profile,
        Err(e) => {
            error!(error = %e, "invalid database configuration");
            std::process::exit(1);
        }
    };

    let app_state = match build_state()
        .with_config(config)
        .with_db(db_profile)
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "failed to build application state");
            std::process::exit(1);
        }
    };

    let watchdog = spawn_watchdog(app_state.round());
    info!(%host, port, "starting shed backend");

    let data = web::Data::new(app_state);

    let result = HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware())
            .wrap(StructuredLogger)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await;

    watchdog.abort();
    result
}
