use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use ecoleta::config::{get_config, CliArgs};
use ecoleta::uploads::UploadStore;
use ecoleta::{create_app, db, logging, run_migrations, AppState};
use tracing::info;

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let (Ok(mut sigterm), Ok(mut sigint)) =
            (signal(SignalKind::terminate()), signal(SignalKind::interrupt()))
        else {
            let _ = tokio::signal::ctrl_c().await;
            return;
        };
        tokio::select! {
            _ = sigterm.recv() => {}
            _ = sigint.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::fs::metadata(".env").is_ok() {
        dotenv::dotenv().ok();
    }

    let args = CliArgs::parse();
    let config = get_config(&args);
    let _log_guard = logging::init_tracing(args.debug, args.log_json, config.log_dir.as_deref())?;

    info!(
        "Configuration: database_url={}, listen={}, uploads_dir={:?}, public_url={}",
        config.database_url, config.listen_addr(), config.uploads_dir, config.public_url()
    );

    let pool = Arc::new(db::init_pool(&config.database_url)?);
    {
        let mut conn = pool.get().context("Failed to get a connection for migrations")?;
        run_migrations(&mut conn)?;
    }

    let uploads = UploadStore::new(
        config.uploads_dir.clone(),
        config.public_url(),
        config.max_upload_bytes,
    );
    uploads.ensure_dir().await?;

    let app = create_app(AppState::new(pool.clone(), uploads));

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutting down, closing database pool");
    drop(pool);
    Ok(())
}
