#![forbid(unsafe_code)]

mod api_error;
mod config;
mod form;
mod models;
mod password;
mod repository;
mod routes;
mod state;
mod upload;

#[cfg(test)]
mod test_support;

use std::{process::exit, sync::Arc};

use config::AppConfig;
use repository::SubmissionRepository;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use state::AppState;
use tokio::{net::TcpListener, signal};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use upload::UploadHandler;

#[tracing::instrument]
#[tokio::main]
async fn main() {
    if let Err(err) = dotenvy::dotenv() {
        warn!("Could not load config from .env file: {err}");
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(
                    "contact_form_service=info"
                        .parse()
                        .expect("Hard-coded default directive should be correct"),
                )
                .from_env_lossy(),
        )
        .init();

    let app_config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("Could not load app config: {err}");
            exit(255);
        }
    };

    let db_pool = match setup_database(&app_config.database_url).await {
        Ok(pool) => pool,
        Err(err) => {
            error!("Could not setup database: {err}");
            exit(255);
        }
    };

    let upload_handler = UploadHandler::new(&app_config.upload_dir, app_config.max_upload_bytes);
    if let Err(err) = upload_handler.ensure_dir().await {
        error!(
            "Could not create upload directory {}: {err}",
            app_config.upload_dir.display()
        );
        exit(255);
    }

    let app_state = AppState {
        submission_repository: Arc::new(SubmissionRepository::new(db_pool.clone())),
        upload_handler: Arc::new(upload_handler),
    };

    match app_state.submission_repository.ensure_schema().await {
        Ok(()) => info!("Table `contact_form` is ready"),
        Err(err) => error!("Could not create table `contact_form`: {err}"),
    }

    let listener = match TcpListener::bind(&app_config.listen_addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("Could not listen on {}: {err}", app_config.listen_addr);
            exit(255);
        }
    };

    info!("Server is running on http://{}", app_config.listen_addr);

    let result = axum::serve(listener, routes::router(app_state))
        .with_graceful_shutdown(async {
            match signal::ctrl_c().await {
                Ok(()) => info!("Ctrl-C received, shutting down"),
                Err(err) => {
                    error!("Could not listen for Ctrl-C: {err}");
                    std::future::pending::<()>().await;
                }
            }
        })
        .await;

    if let Err(err) = result {
        error!("Server failed: {err}");
    }

    db_pool.close().await;
}

#[tracing::instrument(skip(url))]
async fn setup_database(url: &str) -> anyhow::Result<SqlitePool> {
    info!("Connecting to SQLite database");
    let pool = SqlitePoolOptions::new().connect(url).await?;
    info!("Done!");
    Ok(pool)
}
