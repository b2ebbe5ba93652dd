use std::sync::{Arc, Mutex};

use tracing_subscriber::EnvFilter;

use tablier::config::AppConfig;
use tablier::db;
use tablier::services::notify::resend::ResendMailProvider;
use tablier::state::AppState;
use tablier::workflow::TransitionTable;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;

    let transitions = match config.allowed_transitions.as_deref() {
        Some(spec) => {
            let table = TransitionTable::from_spec(spec)?;
            tracing::info!("using transition table from ALLOWED_TRANSITIONS");
            table
        }
        None => TransitionTable::default(),
    };

    if config.mail_api_key.is_empty() {
        tracing::warn!("MAIL_API_KEY not set, email notifications will fail");
    }
    let mailer = ResendMailProvider::new(
        config.mail_api_url.clone(),
        config.mail_api_key.clone(),
        config.mail_from.clone(),
    );

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        mailer: Box::new(mailer),
        transitions,
    });

    let app = tablier::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
