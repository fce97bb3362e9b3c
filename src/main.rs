use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use dotenvy::dotenv;
use std::sync::Arc;
use std::time::Duration;

mod api;
mod auth;
mod config;
mod db;
mod docs;
mod domain;
mod error;
mod model;
mod models;
mod notifier;
mod repo;
mod routes;
mod state;
mod utils;

use config::Config;
use db::init_db;

use crate::docs::ApiDoc;
use crate::domain::events::BroadcastPublisher;
use crate::notifier::{LogSender, dispatch::NotificationDispatcher};
use crate::repo::mysql::{
    MySqlAttendanceRepository, MySqlLeaveRequestRepository, MySqlNotificationRepository,
};
use crate::state::AppState;
use crate::utils::{seed, username_cache};
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi; // needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "HRMS service"
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    let config = Config::from_env();

    // Rolling daily log
    let file_appender = rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let pool = init_db(&config.database_url).await;

    let attendance = Arc::new(MySqlAttendanceRepository::new(pool.clone()));
    let leaves = Arc::new(MySqlLeaveRequestRepository::new(pool.clone()));
    let notifications = Arc::new(MySqlNotificationRepository::new(pool.clone()));
    let publisher = Arc::new(BroadcastPublisher::new(256));

    let app_state = AppState {
        attendance,
        leaves,
        notifications: notifications.clone(),
        events: publisher.clone(),
        policy: config.work_policy(),
    };

    // Event log: drains the broadcast channel so fire-and-forget publishes
    // are visible in the structured log.
    let mut event_rx = publisher.subscribe();
    actix_web::rt::spawn(async move {
        while let Ok((channel, event)) = event_rx.recv().await {
            info!(channel, event = ?event, "Domain event");
        }
    });

    // Seed reference data; the retry inside tolerates a database that is
    // still warming up.
    let pool_for_seed = pool.clone();
    let config_for_seed = config.clone();
    actix_web::rt::spawn(async move {
        seed::seed_reference_data(&pool_for_seed, &config_for_seed).await;
    });

    // Warm up last 30 days of recent users in batches of 250
    let pool_for_cache_warmup = pool.clone();
    actix_web::rt::spawn(async move {
        if let Err(e) = username_cache::warmup_username_cache(&pool_for_cache_warmup, 30, 250).await
        {
            tracing::warn!(error = %e, "Failed to warmup username cache");
        }
    });

    // Background notification dispatcher with a cancellable sleep; the watch
    // channel flips after the HTTP server exits.
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let dispatcher = NotificationDispatcher::new(
        notifications,
        Arc::new(LogSender),
        Duration::from_secs(config.dispatch_interval_secs),
    );
    let dispatcher_handle = actix_web::rt::spawn(dispatcher.run(shutdown_rx));

    let server_addr = config.server_addr.clone();
    let config_data = config.clone();

    let result = HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(pool.clone()))
            .app_data(Data::new(config.clone()))
            .app_data(Data::new(app_state.clone()))
            .service(index)
            // auth + protected routes with rate limiting
            .configure(|cfg| routes::configure(cfg, config_data.clone()))
    })
    .bind(server_addr)?
    .run()
    .await;

    // Stop the dispatcher promptly once the server is down.
    let _ = shutdown_tx.send(true);
    let _ = dispatcher_handle.await;

    result
}
