use clap::Parser;
use dotenv::dotenv;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use sitewatch::analysis::GeminiAnalyzer;
use sitewatch::checker::{BatchRunner, CheckService};
use sitewatch::db::store::PgStore;
use sitewatch::monitoring::fetcher::HttpFetcher;
use sitewatch::notifications::senders::email::EmailSender;
use sitewatch::notifications::service::NotificationService;
use sitewatch::server::config::ServerConfig;
use sitewatch::web::{AppState, run_http_server};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address the HTTP server listens on
    #[arg(long, default_value = "0.0.0.0:8080")]
    listen: SocketAddr,

    /// Run one batch check over all active sites and exit
    #[arg(long)]
    run_batch: bool,
}

fn init_logging() {
    // Log to a file: JSON format, daily rotation
    let file_appender = rolling::daily("logs", "server.log");
    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .json();

    // Log to stdout: human-readable format
    let stdout_layer = fmt::layer().with_writer(std::io::stdout);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx::query=warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv().ok();
    init_logging();

    let args = Args::parse();
    let config = ServerConfig::from_env().expect("invalid server configuration");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let store = Arc::new(PgStore::new(pool.clone()));
    let fetcher = Arc::new(HttpFetcher::new(Duration::from_secs(
        config.fetch_timeout_secs,
    )));
    let analyzer = Arc::new(GeminiAnalyzer::new(
        config.analysis_endpoint.clone(),
        config.analysis_api_key.clone(),
    ));
    let email_sender = config
        .email_api_key
        .clone()
        .map(|key| EmailSender::new(key, config.from_email.clone()));
    let notifier = Arc::new(NotificationService::new(email_sender));

    let checker = Arc::new(CheckService::new(
        store.clone(),
        fetcher,
        analyzer,
        notifier,
        config.app_url.clone(),
    ));
    let batch = Arc::new(BatchRunner::new(
        store,
        checker.clone(),
        Duration::from_millis(config.check_pacing_ms),
    ));

    if args.run_batch {
        let report = batch.run_all().await;
        info!(checked = report.checked_count, "batch run finished");
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let state = Arc::new(AppState {
        db_pool: pool,
        checker,
        batch,
        cron_secret: config.cron_secret.clone(),
    });

    run_http_server(state, args.listen).await
}
