mod application;
mod config;
mod domain;
mod infrastructure;
mod interface;

use crate::application::dispatcher::Dispatcher;
use crate::application::ports::{
    ArticleCatalog, NotificationLedger, PushGateway, SubscriberDirectory,
};
use crate::config::AppConfig;
use crate::infrastructure::{
    database,
    push::HttpPushGateway,
    repositories::{
        PostgresArticleCatalog, PostgresNotificationLedger, PostgresSubscriberDirectory,
    },
};
use crate::interface::amqp::EventConsumer;
use anyhow::Result;
use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    if let Err(err) = bootstrap().await {
        tracing::error!(error = %err, "fatal error");
        eprintln!("fatal error: {err}");
        std::process::exit(1);
    }
}

async fn bootstrap() -> Result<()> {
    init_tracing();

    let config = AppConfig::from_env()?;

    let users_pool =
        database::init_pool(config.users_database_url(), config.db_pool_size()).await?;
    let backend_pool =
        database::init_pool(config.backend_database_url(), config.db_pool_size()).await?;
    let worker_pool =
        database::init_pool(config.worker_database_url(), config.db_pool_size()).await?;
    database::run_migrations(&worker_pool).await?;

    let directory: Arc<dyn SubscriberDirectory> =
        Arc::new(PostgresSubscriberDirectory::new(users_pool));
    let catalog: Arc<dyn ArticleCatalog> = Arc::new(PostgresArticleCatalog::new(backend_pool));
    let ledger: Arc<dyn NotificationLedger> =
        Arc::new(PostgresNotificationLedger::new(worker_pool));
    let push: Arc<dyn PushGateway> = Arc::new(HttpPushGateway::new(
        config.push_url(),
        config.push_timeout(),
        config.push_connect_timeout(),
    )?);

    let dispatcher = Arc::new(Dispatcher::new(
        directory,
        catalog,
        ledger,
        push,
        config.retry_policy(),
        config.concurrency_limit(),
    ));

    let consumer = EventConsumer::new(
        config.amqp_url().to_string(),
        config.queue_name().to_string(),
        config.amqp_reconnect_delay(),
        dispatcher,
    );

    tokio::select! {
        result = consumer.run() => result?,
        () = shutdown_signal() => {}
    }

    Ok(())
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .ok()
        .unwrap_or_else(|| "info,lapin=warn,sqlx=warn".to_string());

    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(env_filter))
        .with(tracing_subscriber::fmt::layer());

    if subscriber.try_init().is_err() {
        tracing::warn!("tracing subscriber already initialised");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install terminate handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("shutdown signal received");
}
