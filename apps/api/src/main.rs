mod analysis;
mod automation;
mod config;
mod errors;
mod integrations;
mod ledger;
mod mail;
mod models;
mod render;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::automation::poller::{run_inbox_poller, PollerConfig};
use crate::automation::{AutomationSwitch, Pipeline};
use crate::config::Config;
use crate::integrations::github::{GithubClient, RepoProvisioner};
use crate::integrations::zapier::ZapierNotifier;
use crate::ledger::Ledger;
use crate::mail::smtp::SmtpMailer;
use crate::mail::Mailer;
use crate::models::profile::Profile;
use crate::render::{PdfResumeRenderer, ResumeRenderer};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JobPilot API v{}", env!("CARGO_PKG_VERSION"));

    let profile = Profile::load(config.profile_path.as_deref().map(std::path::Path::new))?;
    info!("Applicant profile loaded for {}", profile.name);

    let ledger = Arc::new(Ledger::new(&config.ledger_path));
    info!("Application ledger at {}", config.ledger_path);

    let timeout = Duration::from_secs(config.http_timeout_secs);
    let renderer: Arc<dyn ResumeRenderer> = Arc::new(PdfResumeRenderer);
    let repos: Arc<dyn RepoProvisioner> =
        Arc::new(GithubClient::new(config.github_token.clone(), timeout)?);
    let mailer: Arc<dyn Mailer> = Arc::new(SmtpMailer::new(
        &config.smtp_host,
        &config.gmail_address,
        &config.gmail_app_password,
    )?);
    let zapier = match &config.zapier_webhook_url {
        Some(url) => Some(Arc::new(ZapierNotifier::new(url.clone(), timeout)?)),
        None => None,
    };

    let pipeline = Arc::new(Pipeline::new(
        profile,
        ledger.clone(),
        renderer,
        repos,
        mailer,
        zapier,
        config.gmail_address.clone(),
    ));
    let automation = AutomationSwitch::new();

    // Pull-based alternate trigger, active only when configured.
    if config.mail_poll_secs > 0 {
        info!("Inbox poller enabled every {}s", config.mail_poll_secs);
        tokio::spawn(run_inbox_poller(
            pipeline.clone(),
            automation.clone(),
            PollerConfig {
                imap_host: config.imap_host.clone(),
                email: config.gmail_address.clone(),
                password: config.gmail_app_password.clone(),
                interval: Duration::from_secs(config.mail_poll_secs),
            },
        ));
    }

    let state = AppState {
        pipeline,
        ledger,
        automation,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
