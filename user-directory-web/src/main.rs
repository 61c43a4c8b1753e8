//! User directory server entry point

use std::process::ExitCode;

use actix_web::{App, HttpServer, web};
use anyhow::Context;
use user_directory_app::AppStateBuilder;
use user_directory_web::config::AppConfig;
use user_directory_web::middleware::RequestLogger;
use user_directory_web::{logging, routes};

#[actix_web::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Server error: {e:#}");
            eprintln!("user-directory: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    let _log_guard = logging::init(&config.log)?;

    tracing::info!(
        "Starting user directory on {}:{} ({} workers)",
        config.server.host,
        config.server.port,
        config.server.workers
    );
    tracing::info!(
        "Storage: {} (environment {:?})",
        config.storage.path.display(),
        config.storage.environment
    );

    let state = web::Data::new(
        AppStateBuilder::new()
            .db_path(config.storage.path.clone())
            .environment(config.storage.environment.probe())
            .build(),
    );

    HttpServer::new(move || {
        App::new()
            .wrap(RequestLogger)
            .app_data(state.clone())
            .configure(routes::configure)
    })
    .workers(config.server.workers.max(1))
    .bind((config.server.host.as_str(), config.server.port))
    .with_context(|| {
        format!(
            "failed to bind {}:{}",
            config.server.host, config.server.port
        )
    })?
    .run()
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}
