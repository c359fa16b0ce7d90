use std::sync::Arc;

use print_toolkit::api::{self, AppState};
use print_toolkit::rates::DEFAULT_RATE_FILE;
use tracing::Level;

#[tokio::main]
async fn main() {
    let _sentry = std::env::var("SENTRY_DSN").ok().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("development.log")
        .expect("failed to open development.log");

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_max_level(Level::INFO)
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let addr = format!("0.0.0.0:{port}");
    let rate_file =
        std::env::var("RATES_FILE").unwrap_or_else(|_| DEFAULT_RATE_FILE.to_string());

    tracing::info!(rate_file = %rate_file, "starting server");
    let app = api::router(Arc::new(AppState::new(rate_file)));

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    eprintln!("Listening on {addr}");
    axum::serve(listener, app).await.unwrap();
}
